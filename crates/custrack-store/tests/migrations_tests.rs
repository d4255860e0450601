// Integration tests for the migration runner

use custrack_store::migrations::{applied_migrations, apply_migrations};
use rusqlite::Connection;

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    // Given: an empty database
    let mut conn = Connection::open_in_memory().unwrap();

    // When: migrations are applied
    let result = apply_migrations(&mut conn);

    // Then: every table exists
    assert!(result.is_ok(), "migrations failed: {:?}", result.err());
    let tables = table_names(&conn);
    for expected in [
        "audit_log",
        "config_snapshots",
        "customers",
        "packet_snapshots",
        "plugin_snapshot_entries",
        "plugin_snapshots",
        "schema_version",
    ] {
        assert!(tables.contains(&expected.to_string()), "missing table {}", expected);
    }
}

#[test]
fn test_reapplying_is_a_no_op() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    let first = applied_migrations(&conn).unwrap();

    apply_migrations(&mut conn).unwrap();
    let second = applied_migrations(&conn).unwrap();

    assert_eq!(first, second);
    assert_eq!(second[0].migration_id, "001_initial_schema");
    assert_eq!(second[1].migration_id, "002_snapshot_tables");
    assert!(second.iter().all(|m| m.checksum.len() == 64));
}

#[test]
fn test_two_connections_migrate_one_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("store.db");

    let mut a = custrack_store::db::open(&path).unwrap();
    let mut b = custrack_store::db::open(&path).unwrap();
    apply_migrations(&mut a).unwrap();
    apply_migrations(&mut b).unwrap();

    assert_eq!(applied_migrations(&b).unwrap().len(), 2);
}

#[test]
fn test_partial_current_index_rejects_second_current_row() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    conn.execute_batch(
        "INSERT INTO customers (id, last_updated) VALUES ('c1', 0);
         INSERT INTO audit_log (id, customer_id, updated_at, update_source, sub_record)
             VALUES ('a1', 'c1', 0, 'packet', 'config');
         INSERT INTO config_snapshots (id, customer_id, audit_id, current, created_at)
             VALUES ('v1', 'c1', 'a1', 1, 0);",
    )
    .unwrap();

    let second = conn.execute(
        "INSERT INTO config_snapshots (id, customer_id, audit_id, current, created_at)
         VALUES ('v2', 'c1', 'a1', 1, 1)",
        [],
    );
    assert!(second.is_err());
}
