#![allow(clippy::unwrap_used, clippy::expect_used)]

use custrack_core::diff::{compute_diff, ChangeKind, ChangeSet};
use custrack_core::model::{ConfigValues, Customer, PacketValues, PluginValue, PluginValues};
use proptest::prelude::*;
use serde_json::json;

fn plugin(id: &str, version: &str, active: bool) -> PluginValue {
    PluginValue {
        plugin_id: id.to_string(),
        name: id.to_string(),
        version: version.to_string(),
        is_active: active,
        home_page_url: String::new(),
    }
}

#[test]
fn test_identical_packets_have_empty_diff() {
    let p = PacketValues {
        licensed_to: "Acme".into(),
        active_users: 10,
        ..PacketValues::default()
    };
    assert!(compute_diff(&p, &p.clone()).is_empty());
}

#[test]
fn test_packet_from_empty_lists_every_set_field() {
    let p = PacketValues {
        licensed_to: "Acme".into(),
        version: "9.5.0".into(),
        active_users: 10,
        ..PacketValues::default()
    };
    let changes = compute_diff(&PacketValues::default(), &p);
    assert_eq!(changes.len(), 3);
    let active = changes.find("activeUsers").unwrap();
    assert_eq!(active.from, json!(0));
    assert_eq!(active.to, json!(10));
    assert_eq!(active.kind, ChangeKind::Update);
}

#[test]
fn test_config_diff_reports_nested_paths() {
    let old = ConfigValues::new(json!({"ServiceSettings": {"SiteURL": "https://a"}}));
    let new = ConfigValues::new(json!({
        "ServiceSettings": {"SiteURL": "https://b"},
        "SamlSettings": {"Enable": true}
    }));
    let changes = compute_diff(&old, &new);
    assert_eq!(changes.len(), 2);
    assert_eq!(
        changes.find("SamlSettings").map(|c| c.kind),
        Some(ChangeKind::Create)
    );
    assert!(changes.find("ServiceSettings.SiteURL").is_some());
}

#[test]
fn test_plugin_reorder_is_not_a_change() {
    let a = PluginValues::new(vec![plugin("jira", "1", true), plugin("zoom", "2", false)]);
    let b = PluginValues::new(vec![plugin("zoom", "2", false), plugin("jira", "1", true)]);
    assert!(compute_diff(&a, &b).is_empty());
}

#[test]
fn test_plugin_version_bump_is_keyed_by_id() {
    let a = PluginValues::new(vec![plugin("jira", "1", true)]);
    let b = PluginValues::new(vec![plugin("jira", "2", true)]);
    let changes = compute_diff(&a, &b);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes.changes()[0].dotted_path(), "jira.version");
}

#[test]
fn test_plugin_removed_is_delete() {
    let a = PluginValues::new(vec![plugin("jira", "1", true)]);
    let changes = compute_diff(&a, &PluginValues::default());
    assert_eq!(changes.len(), 1);
    assert_eq!(changes.changes()[0].kind, ChangeKind::Delete);
}

#[test]
fn test_duplicate_plugin_ids_are_each_diffed() {
    // Given: an inventory that lists the same plugin id twice
    let old = PluginValues::new(vec![plugin("x", "1", true), plugin("x", "1", true)]);
    let new = PluginValues::new(vec![plugin("x", "2", true), plugin("x", "1", true)]);

    // Then: the change to the first entry is not hidden by the second
    let changes = compute_diff(&old, &new);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes.changes()[0].dotted_path(), "x.version");

    let second = PluginValues::new(vec![plugin("x", "1", true), plugin("x", "3", false)]);
    let paths: Vec<String> = compute_diff(&old, &second)
        .changes()
        .iter()
        .map(|c| c.dotted_path())
        .collect();
    assert_eq!(paths, vec!["x#1.isActive".to_string(), "x#1.version".to_string()]);
}

#[test]
fn test_customer_timestamp_is_ignored() {
    let a = Customer::from_match_keys("c1".into(), "site", "Acme", 1);
    let mut b = a.clone();
    b.last_updated = 2;
    b.region = "APAC".into();
    let changes = compute_diff(&a, &b);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes.changes()[0].dotted_path(), "region");
}

#[test]
fn test_change_set_json_round_trip() {
    let changes = compute_diff(
        &ConfigValues::default(),
        &ConfigValues::new(json!({"a": 1})),
    );
    let text = changes.to_json();
    assert_eq!(ChangeSet::from_json(&text).unwrap(), changes);
    assert_eq!(ChangeSet::default().to_json(), "[]");
}

proptest! {
    #[test]
    fn prop_diff_is_deterministic(users in 0i64..10_000, name in "[a-z]{0,12}") {
        let old = PacketValues::default();
        let new = PacketValues { active_users: users, licensed_to: name, ..PacketValues::default() };
        prop_assert_eq!(compute_diff(&old, &new), compute_diff(&old, &new));
    }

    #[test]
    fn prop_self_diff_is_empty(users in any::<i64>(), os in "[a-zA-Z0-9 ]{0,16}") {
        let p = PacketValues { active_users: users, server_os: os, ..PacketValues::default() };
        prop_assert!(compute_diff(&p, &p).is_empty());
    }

    #[test]
    fn prop_changes_match_differing_fields(a in 0i64..5, b in 0i64..5) {
        let old = PacketValues { total_posts: a, ..PacketValues::default() };
        let new = PacketValues { total_posts: b, ..PacketValues::default() };
        let expected = usize::from(a != b);
        prop_assert_eq!(compute_diff(&old, &new).len(), expected);
    }
}
