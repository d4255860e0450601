use super::record::{VersionHeader, VersionedRecord};
use crate::customers::CustomerRepo;
use crate::errors::{storage, Result};
use custrack_core::model::{PacketValues, SubRecordKind};
use rusqlite::Connection;

impl VersionedRecord for PacketValues {
    const KIND: SubRecordKind = SubRecordKind::Packet;
    const TABLE: &'static str = "packet_snapshots";

    fn load_version(conn: &Connection, version_id: &str) -> Result<Self> {
        conn.query_row(
            "SELECT licensed_to, version, server_os, server_arch, database_type,
                    database_version, database_schema_version, file_driver, active_users,
                    daily_active_users, monthly_active_users, inactive_user_count,
                    license_supported_users, total_posts, total_channels, total_teams,
                    elastic_server_version, metrics, metric_service, hosting_type,
                    deployment_type, mobile_app, products_in_use, saml_provider, ldap_provider
             FROM packet_snapshots WHERE id = ?1",
            [version_id],
            |row| {
                Ok(PacketValues {
                    licensed_to: row.get(0)?,
                    version: row.get(1)?,
                    server_os: row.get(2)?,
                    server_arch: row.get(3)?,
                    database_type: row.get(4)?,
                    database_version: row.get(5)?,
                    database_schema_version: row.get(6)?,
                    file_driver: row.get(7)?,
                    active_users: row.get(8)?,
                    daily_active_users: row.get(9)?,
                    monthly_active_users: row.get(10)?,
                    inactive_user_count: row.get(11)?,
                    license_supported_users: row.get(12)?,
                    total_posts: row.get(13)?,
                    total_channels: row.get(14)?,
                    total_teams: row.get(15)?,
                    elastic_server_version: row.get(16)?,
                    metrics: row.get::<_, i64>(17)? != 0,
                    metric_service: row.get(18)?,
                    hosting_type: row.get(19)?,
                    deployment_type: row.get(20)?,
                    mobile_app: row.get(21)?,
                    products_in_use: row.get(22)?,
                    saml_provider: row.get(23)?,
                    ldap_provider: row.get(24)?,
                })
            },
        )
        .map_err(|e| storage("load_packet", e))
    }

    fn insert_version(conn: &Connection, header: &VersionHeader, value: &Self) -> Result<()> {
        conn.execute(
            "INSERT INTO packet_snapshots (
                id, customer_id, audit_id, current, created_at,
                licensed_to, version, server_os, server_arch, database_type,
                database_version, database_schema_version, file_driver, active_users,
                daily_active_users, monthly_active_users, inactive_user_count,
                license_supported_users, total_posts, total_channels, total_teams,
                elastic_server_version, metrics, metric_service, hosting_type,
                deployment_type, mobile_app, products_in_use, saml_provider, ldap_provider
             ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30
             )",
            rusqlite::params![
                header.id,
                header.customer_id,
                header.audit_id,
                header.current,
                header.created_at,
                value.licensed_to,
                value.version,
                value.server_os,
                value.server_arch,
                value.database_type,
                value.database_version,
                value.database_schema_version,
                value.file_driver,
                value.active_users,
                value.daily_active_users,
                value.monthly_active_users,
                value.inactive_user_count,
                value.license_supported_users,
                value.total_posts,
                value.total_channels,
                value.total_teams,
                value.elastic_server_version,
                value.metrics,
                value.metric_service,
                value.hosting_type,
                value.deployment_type,
                value.mobile_app,
                value.products_in_use,
                value.saml_provider,
                value.ldap_provider,
            ],
        )
        .map_err(|e| storage("insert_packet", e))?;
        Ok(())
    }

    // An empty licensed-to would orphan the customer from future matches
    fn propagate(&self, conn: &Connection, customer_id: &str) -> Result<()> {
        let licensed_to = self.licensed_to.trim();
        if licensed_to.is_empty() {
            return Ok(());
        }
        CustomerRepo::set_licensed_to(conn, customer_id, licensed_to)
    }
}
