use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::diff::Diffable;

/// Sanitized server configuration, stored as an opaque JSON document
///
/// Only a handful of paths are ever interpreted: the site URL used for
/// identity matching and the feature flags shown in packet reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigValues(pub Value);

pub const SITE_URL_POINTER: &str = "/ServiceSettings/SiteURL";

impl Default for ConfigValues {
    fn default() -> Self {
        ConfigValues(Value::Object(Map::new()))
    }
}

impl ConfigValues {
    pub fn new(value: Value) -> Self {
        ConfigValues(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// `ServiceSettings.SiteURL`, if present and non-empty
    pub fn site_url(&self) -> Option<&str> {
        self.text(SITE_URL_POINTER).filter(|s| !s.trim().is_empty())
    }

    /// Boolean at a JSON pointer such as `/SamlSettings/Enable`
    pub fn flag(&self, pointer: &str) -> Option<bool> {
        self.0.pointer(pointer).and_then(Value::as_bool)
    }

    pub fn text(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(Value::as_str)
    }
}

impl Diffable for ConfigValues {
    fn diff_view(&self) -> Value {
        self.0.clone()
    }
}
