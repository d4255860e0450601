//! Field and event names shared by the logging macros and the test capture

/// Every lifecycle event carries these three
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Correlation, stamped on ingestion events
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

pub const FIELD_CUSTOMER_ID: &str = "customer_id";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
