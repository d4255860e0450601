use serde::{Deserialize, Serialize};

use crate::diff::ChangeSet;

/// Who caused an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateSource {
    User,
    Packet,
}

impl UpdateSource {
    /// An empty actor marks a packet-driven (system) update
    pub fn from_actor(actor: &str) -> Self {
        if actor.is_empty() {
            UpdateSource::Packet
        } else {
            UpdateSource::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateSource::User => "user",
            UpdateSource::Packet => "packet",
        }
    }

    pub fn from_column(value: &str) -> Option<Self> {
        match value {
            "user" => Some(UpdateSource::User),
            "packet" => Some(UpdateSource::Packet),
            _ => None,
        }
    }
}

/// Which part of a customer an audit record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubRecordKind {
    Customer,
    Packet,
    Config,
    Plugins,
}

impl SubRecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubRecordKind::Customer => "customer",
            SubRecordKind::Packet => "packet",
            SubRecordKind::Config => "config",
            SubRecordKind::Plugins => "plugins",
        }
    }

    pub fn from_column(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(SubRecordKind::Customer),
            "packet" => Some(SubRecordKind::Packet),
            "config" => Some(SubRecordKind::Config),
            "plugins" => Some(SubRecordKind::Plugins),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubRecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: String,
    pub customer_id: String,
    /// Actor id; empty for packet-driven updates
    pub updated_by: String,
    pub updated_at: i64,
    pub update_source: UpdateSource,
    pub sub_record: SubRecordKind,
    pub diff: ChangeSet,
}
