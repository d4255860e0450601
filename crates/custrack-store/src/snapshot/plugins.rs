use super::record::{VersionHeader, VersionedRecord};
use crate::errors::{storage, Result};
use custrack_core::model::{PluginValue, PluginValues, SubRecordKind};
use rusqlite::Connection;

// Each version is a header row plus one entry row per plugin, keeping the
// inventory order.
impl VersionedRecord for PluginValues {
    const KIND: SubRecordKind = SubRecordKind::Plugins;
    const TABLE: &'static str = "plugin_snapshots";

    fn load_version(conn: &Connection, version_id: &str) -> Result<Self> {
        let mut stmt = conn
            .prepare(
                "SELECT plugin_id, name, version, is_active, home_page_url
                 FROM plugin_snapshot_entries WHERE snapshot_id = ?1
                 ORDER BY position ASC",
            )
            .map_err(|e| storage("load_plugins", e))?;
        let entries = stmt
            .query_map([version_id], |row| {
                Ok(PluginValue {
                    plugin_id: row.get(0)?,
                    name: row.get(1)?,
                    version: row.get(2)?,
                    is_active: row.get::<_, i64>(3)? != 0,
                    home_page_url: row.get(4)?,
                })
            })
            .map_err(|e| storage("load_plugins", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| storage("load_plugins", e))?;
        Ok(PluginValues::new(entries))
    }

    fn insert_version(conn: &Connection, header: &VersionHeader, value: &Self) -> Result<()> {
        conn.execute(
            "INSERT INTO plugin_snapshots (id, customer_id, audit_id, current, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                header.id,
                header.customer_id,
                header.audit_id,
                header.current,
                header.created_at,
            ],
        )
        .map_err(|e| storage("insert_plugins", e))?;

        let mut stmt = conn
            .prepare(
                "INSERT INTO plugin_snapshot_entries
                    (snapshot_id, position, plugin_id, name, version, is_active, home_page_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .map_err(|e| storage("insert_plugins", e))?;
        for (position, plugin) in value.iter().enumerate() {
            stmt.execute(rusqlite::params![
                header.id,
                position as i64,
                plugin.plugin_id,
                plugin.name,
                plugin.version,
                plugin.is_active,
                plugin.home_page_url,
            ])
            .map_err(|e| storage("insert_plugins", e))?;
        }
        Ok(())
    }
}
