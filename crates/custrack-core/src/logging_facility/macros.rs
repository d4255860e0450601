//! Lifecycle macros
//!
//! One operation logs `start`, then either `end` or `end_error`. All three
//! carry `component`, `op` and `event`; the closing events also carry
//! `duration_ms`, and `end_error` adds `err_kind`, `err_code` and `error`.
//! Extra `key = value` fields are passed through to `tracing`.

/// # Example
///
/// ```
/// # use custrack_core::log_op_start;
/// log_op_start!("update_packet");
/// log_op_start!("update_packet", customer_id = "c1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// # Example
///
/// ```
/// # use custrack_core::log_op_end;
/// log_op_end!("update_packet", duration_ms = 42);
/// log_op_end!("update_packet", duration_ms = 42, change_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// `$err` is anything that converts into `ExError`.
///
/// # Example
///
/// ```
/// # use custrack_core::{log_op_error, errors::CustrackError};
/// let err = CustrackError::CustomerNotFound { customer_id: "c1".to_string() };
/// log_op_error!("get_customer", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?err.kind(),
            err_code = err.code(),
            error = %err,
            $($($field)*)?
        )
    }};
}
