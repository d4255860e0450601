//! Support packet documents
//!
//! A support packet archive may carry up to three documents. Each is
//! optional; a document that is present but does not decode fails the whole
//! attachment.

use super::archive::ExtractedArchive;
use custrack_core::errors::CustrackError;
use custrack_core::model::{ConfigValues, PacketValues, PluginValue, PluginValues};
use serde::Deserialize;
use serde_json::Value;

pub const SUPPORT_PACKET_MEMBER: &str = "support_packet.yaml";
pub const CONFIG_MEMBER: &str = "sanitized_config.json";
pub const PLUGINS_MEMBER: &str = "plugins.json";

/// Telemetry document as written by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawSupportPacket {
    pub license_to: String,
    pub site_url: String,
    pub server_os: String,
    pub server_architecture: String,
    pub server_version: String,
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
    pub ldap_vendor_name: String,
}

impl RawSupportPacket {
    pub fn parse(bytes: &[u8]) -> Result<Self, CustrackError> {
        serde_yaml::from_slice(bytes).map_err(|e| malformed(SUPPORT_PACKET_MEMBER, e))
    }
}

impl From<RawSupportPacket> for PacketValues {
    fn from(raw: RawSupportPacket) -> Self {
        PacketValues {
            licensed_to: raw.license_to,
            version: raw.server_version,
            server_os: raw.server_os,
            server_arch: raw.server_architecture,
            database_type: raw.database_type,
            database_version: raw.database_version,
            database_schema_version: raw.database_schema_version,
            file_driver: raw.file_driver,
            active_users: raw.active_users,
            daily_active_users: raw.daily_active_users,
            monthly_active_users: raw.monthly_active_users,
            inactive_user_count: raw.inactive_user_count,
            license_supported_users: raw.license_supported_users,
            total_posts: raw.total_posts,
            total_channels: raw.total_channels,
            total_teams: raw.total_teams,
            elastic_server_version: raw.elastic_server_version,
            metrics: raw.metrics,
            metric_service: raw.metric_service,
            hosting_type: raw.hosting_type,
            deployment_type: raw.deployment_type,
            mobile_app: raw.mobile_app,
            products_in_use: raw.products_in_use,
            saml_provider: raw.saml_provider,
            ldap_provider: raw.ldap_vendor_name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawPluginManifest {
    id: String,
    name: String,
    version: String,
    homepage_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawPluginsResponse {
    active: Vec<RawPluginManifest>,
    inactive: Vec<RawPluginManifest>,
}

/// Decode `plugins.json`; active plugins come first
pub fn parse_plugins(bytes: &[u8]) -> Result<PluginValues, CustrackError> {
    let raw: RawPluginsResponse =
        serde_json::from_slice(bytes).map_err(|e| malformed(PLUGINS_MEMBER, e))?;
    let entry = |m: RawPluginManifest, is_active: bool| PluginValue {
        plugin_id: m.id,
        name: m.name,
        version: m.version,
        is_active,
        home_page_url: m.homepage_url,
    };
    let mut plugins: Vec<PluginValue> = raw.active.into_iter().map(|m| entry(m, true)).collect();
    plugins.extend(raw.inactive.into_iter().map(|m| entry(m, false)));
    Ok(PluginValues::new(plugins))
}

/// Decode `sanitized_config.json`; the document must be a JSON object
pub fn parse_config(bytes: &[u8]) -> Result<ConfigValues, CustrackError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| malformed(CONFIG_MEMBER, e))?;
    if !value.is_object() {
        return Err(CustrackError::MalformedMember {
            member: CONFIG_MEMBER.to_string(),
            reason: "expected a JSON object".to_string(),
        });
    }
    Ok(ConfigValues::new(value))
}

/// Everything decoded from one archive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPacket {
    pub telemetry: Option<RawSupportPacket>,
    pub packet: Option<PacketValues>,
    pub config: Option<ConfigValues>,
    pub plugins: Option<PluginValues>,
}

impl ParsedPacket {
    /// Decode whichever documents the archive carries
    pub fn from_archive(archive: &ExtractedArchive) -> Result<Self, CustrackError> {
        let telemetry = archive
            .get(SUPPORT_PACKET_MEMBER)
            .map(RawSupportPacket::parse)
            .transpose()?;
        let config = archive.get(CONFIG_MEMBER).map(parse_config).transpose()?;
        let plugins = archive.get(PLUGINS_MEMBER).map(parse_plugins).transpose()?;
        Ok(Self {
            packet: telemetry.clone().map(PacketValues::from),
            telemetry,
            config,
            plugins,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.packet.is_none() && self.config.is_none() && self.plugins.is_none()
    }

    /// `(site_url, licensed_to)` for identity resolution
    ///
    /// Only available with telemetry. The config's SiteURL wins over the
    /// telemetry's own `site_url` when it is set.
    pub fn match_keys(&self) -> Option<(String, String)> {
        let telemetry = self.telemetry.as_ref()?;
        let site_url = self
            .config
            .as_ref()
            .and_then(ConfigValues::site_url)
            .unwrap_or(telemetry.site_url.as_str());
        Some((site_url.trim().to_string(), telemetry.license_to.trim().to_string()))
    }
}

fn malformed(member: &str, err: impl std::fmt::Display) -> CustrackError {
    CustrackError::MalformedMember {
        member: member.to_string(),
        reason: err.to_string(),
    }
}
