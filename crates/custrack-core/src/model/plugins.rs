use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::diff::Diffable;

/// One installed plugin as reported by a support packet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginValue {
    pub plugin_id: String,
    pub name: String,
    pub version: String,
    pub is_active: bool,
    #[serde(rename = "homePageURL")]
    pub home_page_url: String,
}

/// Installed-plugin inventory, in report order (active first)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginValues(pub Vec<PluginValue>);

impl PluginValues {
    pub fn new(plugins: Vec<PluginValue>) -> Self {
        PluginValues(plugins)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginValue> {
        self.0.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &PluginValue> {
        self.0.iter().filter(|p| p.is_active)
    }

    pub fn inactive(&self) -> impl Iterator<Item = &PluginValue> {
        self.0.iter().filter(|p| !p.is_active)
    }
}

impl Diffable for PluginValues {
    /// Keyed by plugin id so that a reordered inventory is not a change.
    /// A repeated id is keyed `id#n` for its n-th repeat, and entries without
    /// an id fall back to their position.
    fn diff_view(&self) -> Value {
        let mut map = Map::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, plugin) in self.0.iter().enumerate() {
            let key = if plugin.plugin_id.is_empty() {
                format!("#{}", index)
            } else {
                let repeats = seen.entry(plugin.plugin_id.as_str()).or_insert(0);
                let key = match *repeats {
                    0 => plugin.plugin_id.clone(),
                    n => format!("{}#{}", plugin.plugin_id, n),
                };
                *repeats += 1;
                key
            };
            let mut entry = serde_json::to_value(plugin).unwrap_or(Value::Null);
            if let Value::Object(fields) = &mut entry {
                fields.remove("pluginId");
            }
            map.insert(key, entry);
        }
        Value::Object(map)
    }
}
