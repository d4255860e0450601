use custrack_core::errors::{ExError, ExErrorKind};
use serde::{Deserialize, Serialize};

/// A chat post as delivered to the ingestor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InboundMessage {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    /// Thread root; empty for top-level posts
    pub root_id: String,
    pub file_ids: Vec<String>,
}

impl InboundMessage {
    pub fn is_reply(&self) -> bool {
        !self.root_id.is_empty()
    }
}

/// Attachment metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachmentInfo {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

/// Messaging platform the pipeline reads attachments from and replies to
///
/// Implementations report their own failures as `ExternalService` errors
/// (see [`external_service_error`]).
pub trait MessagePlatform {
    fn attachment_info(&self, file_id: &str) -> Result<AttachmentInfo, ExError>;

    fn attachment_bytes(&self, file_id: &str) -> Result<Vec<u8>, ExError>;

    /// Reply in the thread rooted at `root_id`
    ///
    /// When the root post no longer exists the message must be posted to the
    /// channel as a standalone post instead.
    fn post_reply(&self, channel_id: &str, root_id: &str, message: &str) -> Result<(), ExError>;

    fn post_message(&self, channel_id: &str, message: &str) -> Result<(), ExError>;

    /// True for posts made by the integration itself
    fn is_self_authored(&self, message: &InboundMessage) -> bool;
}

/// Error for a failed platform call
pub fn external_service_error(op: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::ExternalService)
        .with_op(op.to_string())
        .with_message(message)
}
