//! Types shared by the custrack error and logging facilities
//!
//! - [`correlation`]: request and trace ids that tie log events to one inbound
//!   message or API call
//! - [`schema`]: the field and event names lifecycle events use

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
