//! Common types shared between the forecast client, the chart renderer and
//! the web handlers.
//!
//! Nothing in here talks to the network or builds frames; these are plain
//! data structures plus the transport types returned by the JSON API.

mod coordinate;
mod query;
mod response;
mod variables;

pub use coordinate::{Coordinate, CoordinateError};
pub use query::{DEFAULT_TIMEZONE, ForecastQuery, join_names};
pub use response::{CurrentSnapshot, CurrentValue, ForecastResponse, SeriesBlock, VariableSeries};
pub use variables::{
    CURRENT_VARIABLES, DAILY_VARIABLES, ForecastHorizon, HOURLY_VARIABLES, Resolution,
    WeatherVariable, find_variable,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[aliases(ForecastApiResponse = ApiResponse<ForecastDto>)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

// ===================== Forecast =====================

/// One row of a forecast table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastRow {
    /// Timestamp of the row (UTC)
    pub time: DateTime<Utc>,
    /// Value per variable name; `null` when the provider had no value
    pub values: BTreeMap<String, Option<f64>>,
}

/// Hourly forecast for one coordinate pair, as returned by the JSON API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastDto {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone resolved by the provider
    pub timezone: Option<String>,
    /// Number of forecast days requested
    pub days: u8,
    pub rows: Vec<ForecastRow>,
}
