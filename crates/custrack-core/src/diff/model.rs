//! Change-set output types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a single field moved between versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

/// One field-level change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// Segments from the record root to the changed leaf
    pub path: Vec<String>,
    pub from: Value,
    pub to: Value,
}

impl Change {
    /// Dotted path, e.g. `ServiceSettings.SiteURL`
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Ordered list of changes; empty when both versions are equal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet(pub Vec<Change>);

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn changes(&self) -> &[Change] {
        &self.0
    }

    pub fn find(&self, dotted_path: &str) -> Option<&Change> {
        self.0.iter().find(|c| c.dotted_path() == dotted_path)
    }

    /// Serialized form written to the audit log
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
