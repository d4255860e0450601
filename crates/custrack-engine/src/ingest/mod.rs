//! Support packet ingestion
//!
//! A chat message carrying zipped support packets is turned into customer
//! snapshot updates and a markdown reply:
//!
//! 1. [`platform`]: the messaging collaborator the pipeline talks to
//! 2. [`archive`]: in-memory zip extraction
//! 3. [`payload`]: decoding of the packet, config and plugin documents
//! 4. [`pipeline`]: the per-message state machine

pub mod archive;
pub mod payload;
pub mod pipeline;
pub mod platform;

pub use pipeline::{
    AttachmentOutcome, IgnoreReason, IngestionOutcome, IngestionState, PacketIngestor,
};
pub use platform::{AttachmentInfo, InboundMessage, MessagePlatform};
