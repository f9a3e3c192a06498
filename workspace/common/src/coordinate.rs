use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Errors produced while reading a coordinate from user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a decimal number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
}

/// A latitude/longitude pair in decimal degrees.
///
/// Only numeric parsing is checked; values outside the usual ranges are
/// passed through to the provider unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Parse both fields of a submitted form.
    pub fn parse(latitude: Option<&str>, longitude: Option<&str>) -> Result<Self, CoordinateError> {
        let latitude = parse_field("latitude", latitude)?;
        let longitude = parse_field("longitude", longitude)?;
        Ok(Self { latitude, longitude })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<f64, CoordinateError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(CoordinateError::Missing(field))?;

    let value: f64 = raw.parse().map_err(|_| CoordinateError::NotANumber {
        field,
        value: raw.to_string(),
    })?;

    if !value.is_finite() {
        return Err(CoordinateError::NotFinite(field));
    }

    Ok(value)
}
