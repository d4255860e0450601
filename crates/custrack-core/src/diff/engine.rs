//! Change-set computation.
//!
//! Both versions are projected to `serde_json::Value` through [`Diffable`]
//! and walked in parallel. Objects recurse key by key, arrays element by
//! element, and any other mismatch becomes one [`Change`].

use crate::diff::model::{Change, ChangeKind, ChangeSet};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// A record shape the diff engine understands
///
/// The default view is the record's serde serialization. Implementors
/// override it to hide noise fields or to key lists by identity.
pub trait Diffable: Serialize {
    fn diff_view(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Compute the field-level changes from `old` to `new`
pub fn compute_diff<T: Diffable>(old: &T, new: &T) -> ChangeSet {
    diff_values(&old.diff_view(), &new.diff_view())
}

/// Diff two raw JSON values
pub fn diff_values(old: &Value, new: &Value) -> ChangeSet {
    let mut changes = Vec::new();
    let mut path = Vec::new();
    walk(&mut path, old, new, &mut changes);
    ChangeSet(changes)
}

fn walk(path: &mut Vec<String>, old: &Value, new: &Value, out: &mut Vec<Change>) {
    if old == new {
        return;
    }

    match (old, new) {
        (Value::Object(a), Value::Object(b)) => {
            let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
            for key in keys {
                path.push(key.clone());
                walk(
                    path,
                    a.get(key).unwrap_or(&Value::Null),
                    b.get(key).unwrap_or(&Value::Null),
                    out,
                );
                path.pop();
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for index in 0..a.len().max(b.len()) {
                path.push(index.to_string());
                walk(
                    path,
                    a.get(index).unwrap_or(&Value::Null),
                    b.get(index).unwrap_or(&Value::Null),
                    out,
                );
                path.pop();
            }
        }
        _ => out.push(Change {
            kind: classify(old, new),
            path: path.clone(),
            from: old.clone(),
            to: new.clone(),
        }),
    }
}

fn classify(old: &Value, new: &Value) -> ChangeKind {
    match (old.is_null(), new.is_null()) {
        (true, _) => ChangeKind::Create,
        (_, true) => ChangeKind::Delete,
        _ => ChangeKind::Update,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equal_values_produce_no_changes() {
        let v = json!({"a": 1, "b": [1, 2]});
        assert!(diff_values(&v, &v).is_empty());
    }

    #[test]
    fn test_nested_paths() {
        let old = json!({"ServiceSettings": {"SiteURL": "a"}});
        let new = json!({"ServiceSettings": {"SiteURL": "b"}});
        let changes = diff_values(&old, &new);
        assert_eq!(changes.len(), 1);
        let change = &changes.changes()[0];
        assert_eq!(change.dotted_path(), "ServiceSettings.SiteURL");
        assert_eq!(change.kind, ChangeKind::Update);
        assert_eq!(change.from, json!("a"));
        assert_eq!(change.to, json!("b"));
    }

    #[test]
    fn test_create_and_delete_kinds() {
        let changes = diff_values(&json!({"gone": 1}), &json!({"new": 2}));
        assert_eq!(changes.find("gone").map(|c| c.kind), Some(ChangeKind::Delete));
        assert_eq!(changes.find("new").map(|c| c.kind), Some(ChangeKind::Create));
    }

    #[test]
    fn test_keys_visited_in_sorted_order() {
        let old = json!({});
        let new = json!({"zeta": 1, "alpha": 2, "mid": 3});
        let paths: Vec<String> = diff_values(&old, &new)
            .changes()
            .iter()
            .map(Change::dotted_path)
            .collect();
        assert_eq!(paths, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_array_elements_by_index() {
        let changes = diff_values(&json!([1, 2]), &json!([1, 3, 4]));
        assert_eq!(changes.len(), 2);
        assert_eq!(changes.changes()[0].dotted_path(), "1");
        assert_eq!(changes.changes()[1].kind, ChangeKind::Create);
    }
}
