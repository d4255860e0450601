//! Subcommand implementations

pub mod customers;
pub mod ingest;
pub mod migrate;
pub mod resolve;

use custrack_core::logging_facility;
use custrack_engine::{CustomerService, EngineSettings};
use custrack_store::Database;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Settings and database location shared by every subcommand
pub struct Context {
    pub settings: EngineSettings,
}

impl Context {
    /// Load settings, apply the `--db` override and start logging
    pub fn load(db: Option<PathBuf>, config: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = EngineSettings::load(config)?;
        if let Some(db) = db {
            settings.database_path = db;
        }
        logging_facility::init(settings.log_profile);
        Ok(Self { settings })
    }

    /// Open (and migrate) the configured database
    pub fn open_database(&self) -> Result<Database, Box<dyn std::error::Error>> {
        let path = &self.settings.database_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Database::open(path)?)
    }

    pub fn service(&self) -> Result<CustomerService, Box<dyn std::error::Error>> {
        Ok(CustomerService::new(self.open_database()?)
            .with_default_page_size(self.settings.default_page_size))
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_settings(ctx: &Context) -> CliResult {
    print!("{}", ctx.settings.to_toml_string()?);
    Ok(())
}
