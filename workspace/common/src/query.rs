use crate::coordinate::Coordinate;
use crate::variables::{
    CURRENT_VARIABLES, DAILY_VARIABLES, ForecastHorizon, HOURLY_VARIABLES, WeatherVariable,
};

/// Let the provider pick the timezone from the coordinates.
pub const DEFAULT_TIMEZONE: &str = "auto";

/// Everything needed to issue one forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastQuery {
    pub coordinate: Coordinate,
    pub current: &'static [WeatherVariable],
    pub hourly: &'static [WeatherVariable],
    pub daily: &'static [WeatherVariable],
    /// `None` leaves the horizon to the provider default
    pub horizon: Option<ForecastHorizon>,
    pub timezone: String,
}

impl ForecastQuery {
    /// Query with the fixed variable sets used by the application.
    pub fn standard(coordinate: Coordinate, horizon: Option<ForecastHorizon>) -> Self {
        Self {
            coordinate,
            current: CURRENT_VARIABLES,
            hourly: HOURLY_VARIABLES,
            daily: DAILY_VARIABLES,
            horizon,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }

    /// Stable textual key; identical queries always produce identical keys.
    pub fn cache_key(&self) -> String {
        let days = self
            .horizon
            .map(|h| h.days().to_string())
            .unwrap_or_else(|| "default".to_string());

        format!(
            "lat={};lon={};current={};hourly={};daily={};days={};tz={}",
            self.coordinate.latitude,
            self.coordinate.longitude,
            join_names(self.current),
            join_names(self.hourly),
            join_names(self.daily),
            days,
            self.timezone,
        )
    }
}

/// Comma-joined provider names, the format the provider expects.
pub fn join_names(variables: &[WeatherVariable]) -> String {
    variables.iter().map(|v| v.name).collect::<Vec<_>>().join(",")
}
