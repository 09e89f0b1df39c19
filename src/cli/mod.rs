//! CLI module for the DevConnector API
//!
//! - `serve`: run the HTTP server
//! - `migrate`: apply the PostgreSQL schema and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// DevConnector API - user registration service
#[derive(Parser)]
#[command(name = "devconnector-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply database migrations and exit
    Migrate,
}

/// Load `.env`, configuration and the tracing subscriber
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}
