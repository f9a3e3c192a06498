use anyhow::{Context, Result, anyhow};
use common::{Coordinate, ForecastHorizon, ForecastQuery};
use forecast::table::build_table;
use tracing::{debug, info};

use crate::config::{Settings, initialize_app_state};

/// Fetches one forecast through the application's client stack and prints
/// the hourly table to stdout.
pub async fn fetch(latitude: &str, longitude: &str, days: u8, settings: &Settings) -> Result<()> {
    let coordinate = Coordinate::parse(Some(latitude), Some(longitude))?;
    let horizon = ForecastHorizon::new(days).ok_or_else(|| {
        anyhow!(
            "days must be between 1 and {}, got {}",
            ForecastHorizon::MAX_DAYS,
            days
        )
    })?;

    let state = initialize_app_state(settings)?;
    debug!("Using cache backend: {}", state.cache);

    info!("Fetching {} forecast for {}", horizon, coordinate);
    let response = state
        .client
        .fetch(&ForecastQuery::standard(coordinate, Some(horizon)))
        .await?;

    let hourly = response
        .hourly
        .context("Provider response has no hourly block")?;
    let df = build_table(&hourly)?;

    println!(
        "Forecast for {} ({})",
        coordinate,
        response.timezone.as_deref().unwrap_or("UTC")
    );
    println!("{}", df);

    Ok(())
}
