//! Logging for every custrack crate
//!
//! Binaries call [`init`] once with a [`Profile`]. Operations are bracketed
//! with the `log_op_*` macros, which only the engine layer uses; store and
//! core code log `tracing::debug!` details. Tests assert on emitted events
//! through [`init_test_capture`].
//!
//! ```rust
//! use custrack_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
