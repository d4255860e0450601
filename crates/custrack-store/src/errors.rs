//! Error handling for custrack-store
//!
//! Wraps custrack-core ExError with store-specific helpers

use custrack_core::errors::{CustrackError, ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Storage)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Storage failure with the operation that hit it
pub fn storage(op: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Storage)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// Wrap a lower-level error with the calling operation
pub fn wrap(op: &str, err: ExError) -> ExError {
    ExError::new(err.kind())
        .with_op(op.to_string())
        .with_message(err.message().to_string())
        .with_source(err)
}

/// Unknown customer id
pub fn customer_not_found(op: &str, customer_id: &str) -> ExError {
    ExError::from(CustrackError::CustomerNotFound {
        customer_id: customer_id.to_string(),
    })
    .with_op(op.to_string())
}

/// Stored JSON that no longer decodes
pub fn corrupt_json(op: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(op.to_string())
        .with_message(format!("stored JSON is unreadable: {}", err))
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Storage)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Storage)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ))
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
