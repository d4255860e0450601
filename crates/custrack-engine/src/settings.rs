//! Engine settings
//!
//! Layered as: built-in defaults, then an optional TOML file, then
//! `CUSTRACK_*` environment variables (`CUSTRACK_MAX_ARCHIVE_BYTES=...`).

use config::{Config, Environment, File, FileFormat};
use custrack_core::errors::{ExError, ExErrorKind};
use custrack_core::logging_facility::Profile;
use custrack_core::model::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "CUSTRACK";

/// Largest accepted archive, 50 MiB
pub const DEFAULT_MAX_ARCHIVE_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub database_path: PathBuf,
    /// Page size when a listing asks for 0
    pub default_page_size: u32,
    pub max_archive_bytes: u64,
    /// MIME types treated as archives regardless of file name
    pub archive_mime_types: Vec<String>,
    pub log_profile: Profile,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(".custrack/store.db"),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_archive_bytes: DEFAULT_MAX_ARCHIVE_BYTES,
            archive_mime_types: vec![
                "application/zip".to_string(),
                "application/x-zip-compressed".to_string(),
            ],
            log_profile: Profile::default(),
        }
    }
}

impl EngineSettings {
    /// Defaults, overlaid with `path` (if any) and `CUSTRACK_*` variables
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the file is missing or a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ExError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// [`EngineSettings::load`] with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self, ExError> {
        let mut builder = Config::builder().add_source(defaults_source()?);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("archive_mime_types"),
            )
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(settings_error)
    }

    /// Parse a TOML document over the defaults, without environment overlay
    pub fn from_toml_str(text: &str) -> Result<Self, ExError> {
        Config::builder()
            .add_source(defaults_source()?)
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(settings_error)
    }

    pub fn to_toml_string(&self) -> Result<String, ExError> {
        toml::to_string_pretty(self).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("render_settings")
                .with_message(e.to_string())
        })
    }

    pub fn is_archive_mime(&self, mime_type: &str) -> bool {
        self.archive_mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime_type.trim()))
    }
}

fn defaults_source() -> Result<Config, ExError> {
    Config::try_from(&EngineSettings::default()).map_err(settings_error)
}

fn settings_error(err: config::ConfigError) -> ExError {
    ExError::new(ExErrorKind::InvalidArgument)
        .with_op("load_settings")
        .with_message(err.to_string())
}
