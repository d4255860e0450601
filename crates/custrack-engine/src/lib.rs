//! custrack engine - orchestration layer
//!
//! Provides the customer service API, command dispatch and the support packet
//! ingestion pipeline, coordinating core domain logic with the store.
//!
//! ## Logging Ownership
//!
//! This crate owns lifecycle logging (`log_op_start!`, `log_op_end!`,
//! `log_op_error!`). Lower layers only emit `tracing::debug!` details.

pub mod commands;
pub mod ingest;
pub mod settings;

pub use commands::customer_service::{CustomerHistory, CustomerService};
pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use settings::EngineSettings;
