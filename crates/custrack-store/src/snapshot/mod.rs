//! Versioned customer sub-records
//!
//! Packet, config and plugin values are stored as immutable versions. Each
//! write appends a version, flips the previous one to not-current, and records
//! an audit entry with the diff, all in one immediate transaction.

mod config;
mod packet;
mod plugins;
mod record;

pub use record::{
    get_current, list_versions, update_record, SnapshotReceipt, SnapshotVersion, VersionHeader,
    VersionedRecord,
};
