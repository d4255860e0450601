use super::record::{VersionHeader, VersionedRecord};
use crate::customers::CustomerRepo;
use crate::errors::{corrupt_json, storage, Result};
use custrack_core::model::{ConfigValues, SubRecordKind};
use rusqlite::Connection;

impl VersionedRecord for ConfigValues {
    const KIND: SubRecordKind = SubRecordKind::Config;
    const TABLE: &'static str = "config_snapshots";

    fn load_version(conn: &Connection, version_id: &str) -> Result<Self> {
        let text: String = conn
            .query_row(
                "SELECT config FROM config_snapshots WHERE id = ?1",
                [version_id],
                |row| row.get(0),
            )
            .map_err(|e| storage("load_config", e))?;
        let value = serde_json::from_str(&text).map_err(|e| corrupt_json("load_config", e))?;
        Ok(ConfigValues::new(value))
    }

    fn insert_version(conn: &Connection, header: &VersionHeader, value: &Self) -> Result<()> {
        conn.execute(
            "INSERT INTO config_snapshots (id, customer_id, audit_id, current, created_at, config)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                header.id,
                header.customer_id,
                header.audit_id,
                header.current,
                header.created_at,
                value.as_value(),
            ],
        )
        .map_err(|e| storage("insert_config", e))?;
        Ok(())
    }

    fn propagate(&self, conn: &Connection, customer_id: &str) -> Result<()> {
        match self.site_url() {
            Some(site_url) => CustomerRepo::set_site_url(conn, customer_id, site_url),
            None => Ok(()),
        }
    }
}
