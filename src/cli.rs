use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use crate::config::Settings;
use commands::{fetch, serve};

#[derive(Parser)]
#[command(name = "meteochart")]
#[command(about = "Weather forecast charts from Open-Meteo, served as a web page")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        #[command(flatten)]
        settings: Settings,
    },
    /// Fetch one forecast and print the hourly table
    ///
    /// Uses the same retrying and caching client as the web server.
    ///
    /// Example:
    ///   meteochart fetch --latitude 43.3182 --longitude 11.3306 --days 3
    Fetch {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        latitude: String,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        longitude: String,

        /// Number of forecast days (1-16)
        #[arg(short, long, default_value_t = 1)]
        days: u8,

        #[command(flatten)]
        settings: Settings,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { settings } => {
                serve(&settings).await?;
            }
            Commands::Fetch {
                latitude,
                longitude,
                days,
                settings,
            } => {
                fetch(&latitude, &longitude, days, &settings).await?;
            }
        }
        Ok(())
    }
}
