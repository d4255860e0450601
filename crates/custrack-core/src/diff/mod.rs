//! Structural diff engine for customer sub-records.
//!
//! Compares two versions of a packet, config document, plugin inventory or
//! customer record and produces the field-level change set stored in the
//! audit log.
//!
//! ## Entry point
//!
//! ```
//! use custrack_core::diff::compute_diff;
//! use custrack_core::model::PacketValues;
//!
//! let old = PacketValues::default();
//! let new = PacketValues { active_users: 12, ..PacketValues::default() };
//! let changes = compute_diff(&old, &new);
//! assert_eq!(changes.len(), 1);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: object keys are visited in sorted order, so identical
//!   inputs always produce identical change sets.
//! - **Infallible**: values that cannot be serialized diff as `null` instead
//!   of failing; an imprecise audit entry beats a missing one.

pub mod engine;
pub mod model;

pub use engine::{compute_diff, diff_values, Diffable};
pub use model::{Change, ChangeKind, ChangeSet};
