#![allow(dead_code)]

use custrack_core::model::{ConfigValues, PacketValues, PluginValue, PluginValues};
use custrack_store::identity::resolve_customer;
use custrack_store::migrations::apply_migrations;
use rusqlite::Connection;
use serde_json::json;
use tempfile::TempDir;

/// Migrated in-memory connection
pub fn setup_db() -> Connection {
    let mut conn = custrack_store::db::open_in_memory().expect("open in-memory db");
    apply_migrations(&mut conn).expect("apply migrations");
    conn
}

/// Migrated file-backed database in a temp dir; keep the TempDir alive
pub fn setup_file_db() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("store.db");
    let mut conn = custrack_store::db::open(&path).expect("open db file");
    apply_migrations(&mut conn).expect("apply migrations");
    (dir, path)
}

/// Create a customer through identity resolution and return its id
pub fn create_customer(conn: &mut Connection, site_url: &str, licensed_to: &str) -> String {
    resolve_customer(conn, site_url, licensed_to)
        .expect("resolve customer")
        .customer_id
}

pub fn packet(licensed_to: &str, active_users: i64) -> PacketValues {
    PacketValues {
        licensed_to: licensed_to.to_string(),
        version: "9.5.0".to_string(),
        server_os: "linux".to_string(),
        active_users,
        ..PacketValues::default()
    }
}

pub fn config(site_url: &str) -> ConfigValues {
    ConfigValues::new(json!({
        "ServiceSettings": { "SiteURL": site_url },
        "SqlSettings": { "DriverName": "postgres" }
    }))
}

pub fn plugins() -> PluginValues {
    PluginValues::new(vec![
        PluginValue {
            plugin_id: "jira".to_string(),
            name: "Jira".to_string(),
            version: "4.0.0".to_string(),
            is_active: true,
            home_page_url: "https://example.com/jira".to_string(),
        },
        PluginValue {
            plugin_id: "zoom".to_string(),
            name: "Zoom".to_string(),
            version: "1.6.0".to_string(),
            is_active: false,
            home_page_url: String::new(),
        },
    ])
}

pub fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).expect("count query")
}
