//! Schema migrations
//!
//! The SQL files under `migrations/` are compiled in and applied in order.
//! `schema_version` records each one with a sha256 of its text, and a
//! recorded migration whose text has since changed is refused.

mod checksums;
mod embedded;
mod runner;

pub use runner::{applied_migrations, apply_migrations, AppliedMigration};
