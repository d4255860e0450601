use serde::{Deserialize, Serialize};

use crate::diff::Diffable;

/// Telemetry extracted from a support packet
///
/// The default value is the empty packet returned for customers that never
/// uploaded one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PacketValues {
    pub licensed_to: String,
    pub version: String,
    #[serde(rename = "serverOS")]
    pub server_os: String,
    pub server_arch: String,
    pub database_type: String,
    pub database_version: String,
    pub database_schema_version: String,
    pub file_driver: String,
    pub active_users: i64,
    pub daily_active_users: i64,
    pub monthly_active_users: i64,
    pub inactive_user_count: i64,
    pub license_supported_users: i64,
    pub total_posts: i64,
    pub total_channels: i64,
    pub total_teams: i64,
    pub elastic_server_version: String,
    pub metrics: bool,
    pub metric_service: String,
    pub hosting_type: String,
    pub deployment_type: String,
    pub mobile_app: String,
    pub products_in_use: String,
    pub saml_provider: String,
    pub ldap_provider: String,
}

impl PacketValues {
    pub fn is_empty(&self) -> bool {
        *self == PacketValues::default()
    }
}

impl Diffable for PacketValues {}
