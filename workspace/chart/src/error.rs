use forecast::ForecastError;
use thiserror::Error;

/// Error types for chart rendering
#[derive(Error, Debug)]
pub enum ChartError {
    /// A selected column is not part of the table
    #[error("Column '{0}' not found in forecast table")]
    MissingColumn(String),

    /// The table could not be read back
    #[error("DataFrame error: {0}")]
    DataFrame(String),
}

impl From<ForecastError> for ChartError {
    fn from(error: ForecastError) -> Self {
        ChartError::DataFrame(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
