use async_trait::async_trait;
use common::{
    CurrentSnapshot, CurrentValue, ForecastQuery, ForecastResponse, Resolution, SeriesBlock,
    VariableSeries, WeatherVariable, join_names,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use super::ForecastClient;
use crate::error::{ForecastError, Result};

/// Public Open-Meteo forecast endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

const DST_SHIFT_SECS: u64 = 3_600;

/// Client for the Open-Meteo forecast API.
///
/// Every call to [`ForecastClient::fetch`] issues exactly one HTTP request;
/// retries and caching are layered on top by the wrapping clients.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    endpoint: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("meteochart/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query string parameters for a forecast query.
    pub fn query_params(query: &ForecastQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("latitude", query.coordinate.latitude.to_string()),
            ("longitude", query.coordinate.longitude.to_string()),
        ];

        if !query.current.is_empty() {
            params.push(("current", join_names(query.current)));
        }
        if !query.hourly.is_empty() {
            params.push(("hourly", join_names(query.hourly)));
        }
        if !query.daily.is_empty() {
            params.push(("daily", join_names(query.daily)));
        }
        if let Some(horizon) = query.horizon {
            params.push(("forecast_days", horizon.days().to_string()));
        }

        params.push(("timezone", query.timezone.clone()));
        params.push(("timeformat", "unixtime".to_string()));
        params
    }
}

#[async_trait]
impl ForecastClient for OpenMeteoClient {
    #[instrument(skip(self, query), fields(coordinate = %query.coordinate, horizon = ?query.horizon))]
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&Self::query_params(query))
            .send()
            .await
            .map_err(|e| ForecastError::Transport(format!("Failed to send request to Open-Meteo: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ForecastError::Transport(format!("Failed to read Open-Meteo response body: {e}")))?;

        if !status.is_success() {
            let message = provider_reason(&body).unwrap_or_else(|| truncate_body(&body));
            warn!(status = status.as_u16(), %message, "Open-Meteo request failed");
            return Err(ForecastError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        debug!(bytes = body.len(), "Open-Meteo response received");
        parse_response(&body, query)
    }
}

#[derive(Debug, Deserialize)]
struct OmErrorBody {
    reason: String,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    latitude: f64,
    longitude: f64,
    elevation: Option<f64>,
    timezone: Option<String>,
    #[serde(default)]
    utc_offset_seconds: i64,
    current: Option<OmCurrent>,
    hourly: Option<OmBlock>,
    daily: Option<OmBlock>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: i64,
    interval: Option<i64>,
    #[serde(flatten)]
    values: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct OmBlock {
    time: Vec<i64>,
    #[serde(flatten)]
    values: HashMap<String, Value>,
}

/// Decode a provider body, keeping only the requested variables in the
/// requested order.
pub fn parse_response(body: &str, query: &ForecastQuery) -> Result<ForecastResponse> {
    let parsed: OmResponse = serde_json::from_str(body)
        .map_err(|e| ForecastError::Decode(format!("Failed to parse Open-Meteo JSON: {e}")))?;

    let current = match parsed.current {
        Some(raw) if !query.current.is_empty() => Some(into_snapshot(raw, query.current)?),
        _ => None,
    };
    let hourly = match parsed.hourly {
        Some(raw) if !query.hourly.is_empty() => {
            Some(into_block(raw, query.hourly, Resolution::Hourly)?)
        }
        _ => None,
    };
    let daily = match parsed.daily {
        Some(raw) if !query.daily.is_empty() => {
            Some(into_block(raw, query.daily, Resolution::Daily)?)
        }
        _ => None,
    };

    Ok(ForecastResponse {
        latitude: parsed.latitude,
        longitude: parsed.longitude,
        elevation: parsed.elevation,
        timezone: parsed.timezone,
        utc_offset_seconds: parsed.utc_offset_seconds,
        current,
        hourly,
        daily,
    })
}

/// Rebuilds `start/end/interval` from the block's `time` array.
///
/// Daily times are local midnights, so a DST change makes one step 23 or 25
/// hours long. Such steps are accepted and the block keeps the first step as
/// its interval, which places later daily points up to an hour off local
/// midnight. Any other irregular step is a decode error.
fn into_block(
    mut raw: OmBlock,
    requested: &[WeatherVariable],
    resolution: Resolution,
) -> Result<SeriesBlock> {
    let start = raw.time.first().copied().unwrap_or(0);
    let interval = block_interval(&raw.time, resolution)?;
    let end = i64::try_from(raw.time.len())
        .ok()
        .and_then(|len| len.checked_mul(interval))
        .and_then(|span| start.checked_add(span))
        .ok_or_else(|| ForecastError::Decode(format!("{resolution} time range overflows")))?;

    let mut variables = Vec::with_capacity(requested.len());
    for variable in requested {
        let value = raw.values.remove(variable.name).ok_or_else(|| {
            ForecastError::Decode(format!(
                "Missing variable '{}' in {resolution} block",
                variable.name
            ))
        })?;
        variables.push(VariableSeries::new(
            variable.name,
            into_values(value, variable.name, resolution)?,
        ));
    }

    Ok(SeriesBlock {
        start,
        end,
        interval,
        variables,
    })
}

fn block_interval(time: &[i64], resolution: Resolution) -> Result<i64> {
    let step = |pair: &[i64]| {
        pair[1]
            .checked_sub(pair[0])
            .ok_or_else(|| ForecastError::Decode(format!("{resolution} time step overflows")))
    };

    let interval = match time {
        [first, second, ..] => step(&[*first, *second])?,
        _ => return Ok(resolution.nominal_interval_secs()),
    };
    if interval <= 0 {
        return Err(ForecastError::Decode(format!(
            "{resolution} time steps must increase, got {interval}s"
        )));
    }

    let tolerance = match resolution {
        Resolution::Daily => DST_SHIFT_SECS,
        Resolution::Hourly | Resolution::Current => 0,
    };
    for pair in time.windows(2) {
        let current = step(pair)?;
        if current.abs_diff(interval) > tolerance {
            return Err(ForecastError::Decode(format!(
                "{resolution} time steps are not uniform: {current}s after {interval}s"
            )));
        }
    }
    Ok(interval)
}

fn into_values(value: Value, name: &str, resolution: Resolution) -> Result<Vec<Option<f64>>> {
    let Value::Array(items) = value else {
        return Err(ForecastError::Decode(format!(
            "Variable '{name}' in {resolution} block is not an array"
        )));
    };

    Ok(items.iter().map(Value::as_f64).collect())
}

fn into_snapshot(mut raw: OmCurrent, requested: &[WeatherVariable]) -> Result<CurrentSnapshot> {
    let mut values = Vec::with_capacity(requested.len());
    for variable in requested {
        let value = raw.values.remove(variable.name).ok_or_else(|| {
            ForecastError::Decode(format!(
                "Missing variable '{}' in current block",
                variable.name
            ))
        })?;
        values.push(CurrentValue {
            name: variable.name.to_string(),
            value: value.as_f64(),
        });
    }

    Ok(CurrentSnapshot {
        time: raw.time,
        interval: raw
            .interval
            .unwrap_or_else(|| Resolution::Current.nominal_interval_secs()),
        values,
    })
}

fn provider_reason(body: &str) -> Option<String> {
    serde_json::from_str::<OmErrorBody>(body)
        .ok()
        .map(|b| b.reason)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &body[..cut])
}
