//! custrack CLI
//!
//! Command-line interface for the customer store and support packet ingestion

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "custrack")]
#[command(about = "custrack - customer records from support packets", long_about = None)]
struct Cli {
    /// SQLite database file (defaults to the settings' database_path)
    #[arg(long, global = true, env = "CUSTRACK_DB")]
    db: Option<PathBuf>,

    /// Engine settings file (TOML)
    #[arg(long, global = true, env = "CUSTRACK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// Customer listing, inspection and edits
    Customers(commands::customers::CustomersArgs),
    /// Run a local support packet archive through the ingestion pipeline
    Ingest(commands::ingest::IngestArgs),
    /// Resolve matching keys to a customer, creating it if needed
    Resolve(commands::resolve::ResolveArgs),
    /// Print the effective engine settings
    Settings,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = commands::Context::load(cli.db, cli.config.as_deref()).and_then(|ctx| {
        match cli.command {
            Commands::Migrate => commands::migrate::execute(&ctx),
            Commands::Customers(args) => commands::customers::execute(&ctx, args),
            Commands::Ingest(args) => commands::ingest::execute(&ctx, args),
            Commands::Resolve(args) => commands::resolve::execute(&ctx, args),
            Commands::Settings => commands::print_settings(&ctx),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
