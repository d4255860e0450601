//! custrack store - SQLite persistence for customers, snapshots and audit
//!
//! Provides:
//! - Connection setup and the shared [`db::Database`] handle
//! - Embedded, checksummed schema migrations
//! - The append-only audit log
//! - Versioned packet/config/plugin snapshots with a single current row
//! - Identity resolution and customer directory queries
//!
//! Every multi-statement write runs inside one `BEGIN IMMEDIATE`
//! transaction, so concurrent writers serialize on the database lock.

pub mod audit;
pub mod customers;
pub mod db;
pub mod directory;
pub mod errors;
pub mod identity;
pub mod migrations;
pub mod snapshot;

// Re-export key types
pub use db::Database;
pub use errors::Result;
