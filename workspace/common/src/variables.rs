use serde::{Deserialize, Serialize};
use std::fmt;

/// A weather metric known to the provider together with the label shown on
/// charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeatherVariable {
    /// Provider-side variable name, e.g. `temperature_2m`
    pub name: &'static str,
    /// Human readable label including the unit
    pub label: &'static str,
}

impl WeatherVariable {
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label }
    }
}

/// Variables requested for the current-conditions snapshot.
pub const CURRENT_VARIABLES: &[WeatherVariable] = &[
    WeatherVariable::new("temperature_2m", "Temperature (°C)"),
    WeatherVariable::new("relative_humidity_2m", "Humidity (%)"),
    WeatherVariable::new("apparent_temperature", "Apparent Temperature (°C)"),
    WeatherVariable::new("is_day", "Daylight"),
];

/// Variables requested at hourly resolution, in chart order.
pub const HOURLY_VARIABLES: &[WeatherVariable] = &[
    WeatherVariable::new("temperature_2m", "Temperature (°C)"),
    WeatherVariable::new("relative_humidity_2m", "Humidity (%)"),
    WeatherVariable::new("apparent_temperature", "Apparent Temperature (°C)"),
    WeatherVariable::new("precipitation_probability", "Precipitation Probability (%)"),
    WeatherVariable::new("surface_pressure", "Pressure (hPa)"),
    WeatherVariable::new("cloud_cover", "Cloud Cover (%)"),
    WeatherVariable::new("visibility", "Visibility (m)"),
    WeatherVariable::new("wind_speed_10m", "Wind Speed (km/h)"),
];

/// Variables requested at daily resolution, in chart order.
pub const DAILY_VARIABLES: &[WeatherVariable] = &[
    WeatherVariable::new("temperature_2m_max", "Max Temperature (°C)"),
    WeatherVariable::new("temperature_2m_min", "Min Temperature (°C)"),
    WeatherVariable::new("precipitation_probability_max", "Max Precipitation Probability (%)"),
    WeatherVariable::new("wind_speed_10m_max", "Max Wind Speed (km/h)"),
];

/// Look up a variable by provider name in one of the fixed sets.
pub fn find_variable(set: &[WeatherVariable], name: &str) -> Option<WeatherVariable> {
    set.iter().copied().find(|v| v.name == name)
}

/// Granularity tier of returned data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Current,
    Hourly,
    Daily,
}

impl Resolution {
    /// Query parameter / response key used by the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Current => "current",
            Resolution::Hourly => "hourly",
            Resolution::Daily => "daily",
        }
    }

    /// Step between two points when the response does not make it explicit.
    pub fn nominal_interval_secs(&self) -> i64 {
        match self {
            Resolution::Current => 900,
            Resolution::Hourly => 3_600,
            Resolution::Daily => 86_400,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of forward-looking days requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForecastHorizon(u8);

impl ForecastHorizon {
    pub const ONE_DAY: ForecastHorizon = ForecastHorizon(1);
    pub const THREE_DAYS: ForecastHorizon = ForecastHorizon(3);
    pub const SEVEN_DAYS: ForecastHorizon = ForecastHorizon(7);

    /// Longest horizon the provider accepts.
    pub const MAX_DAYS: u8 = 16;

    /// Horizons rendered on the index page, one chart section each.
    pub const PAGE_HORIZONS: [ForecastHorizon; 3] = [
        ForecastHorizon::ONE_DAY,
        ForecastHorizon::THREE_DAYS,
        ForecastHorizon::SEVEN_DAYS,
    ];

    pub fn new(days: u8) -> Option<Self> {
        (1..=Self::MAX_DAYS).contains(&days).then_some(Self(days))
    }

    pub fn days(&self) -> u8 {
        self.0
    }

    /// Section title used on the page.
    pub fn title(&self) -> String {
        match self.0 {
            1 => "Next 24 hours".to_string(),
            n => format!("Next {n} days"),
        }
    }
}

impl fmt::Display for ForecastHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.0)
    }
}
