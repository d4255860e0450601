//! custrack core - domain model and pure logic
//!
//! This crate holds everything that does not touch storage or the network:
//! - Customer, snapshot payload and audit models
//! - The structural diff engine used for audit records
//! - Identity match decision rules
//! - Listing filters and pagination math
//! - Markdown rendering of support packet reports
//! - The error and logging facilities shared by every other crate

pub mod diff;
pub mod errors;
pub mod identity;
pub mod logging_facility;
pub mod model;
pub mod render;

pub use custrack_core_types::schema;

// Re-export commonly used types
pub use errors::{CustrackError, ExError, ExErrorKind, Result};
pub use model::{
    AuditRecord, ConfigValues, Customer, CustomerFilter, CustomerFull, CustomerPatch,
    PacketValues, PagedResult, PluginValue, PluginValues, SubRecordKind, UpdateSource,
};
