//! CLI module for the Film Catalog API
//!
//! Provides subcommands:
//! - `serve`: HTTP API server (default)
//! - `migrate`: apply database migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Film Catalog API - registered users managing a catalog of films
#[derive(Parser)]
#[command(name = "film-catalog-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Run the HTTP API server (default)
    #[default]
    Serve,

    /// Apply pending database migrations and exit
    Migrate {
        /// Revert the most recently applied migration instead
        #[arg(long)]
        revert: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }
}

/// Load `.env`, configuration and logging shared by every subcommand
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}
