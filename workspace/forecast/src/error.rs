use thiserror::Error;
use tracing::error;

/// Error types for the forecast module
#[derive(Error, Debug)]
pub enum ForecastError {
    /// The request never produced a response (connect, timeout, TLS, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status
    #[error("Provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    /// The provider answered but the body could not be understood
    #[error("Decode error: {0}")]
    Decode(String),

    /// Interval metadata that cannot produce a timestamp axis
    #[error("Invalid interval: start={start}, end={end}, interval={interval}")]
    InvalidInterval { start: i64, end: i64, interval: i64 },

    /// A variable array does not line up with the generated timestamps
    #[error("Shape mismatch for '{variable}': expected {expected} values, got {actual}")]
    ShapeMismatch {
        variable: String,
        expected: usize,
        actual: usize,
    },

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),

    /// Error from the response cache
    #[error("Cache error: {0}")]
    Cache(String),

    /// Every retry attempt failed; carries the last failure
    #[error("Forecast request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        source: Box<ForecastError>,
    },
}

impl ForecastError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Transport failures, 5xx, 429 and 408 are retried; any other provider
    /// status means the request itself is wrong.
    pub fn is_retryable(&self) -> bool {
        match self {
            ForecastError::Transport(_) => true,
            ForecastError::Provider { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            _ => false,
        }
    }

    /// True when the failure came from the upstream provider rather than
    /// from local processing.
    pub fn is_upstream(&self) -> bool {
        match self {
            ForecastError::Transport(_)
            | ForecastError::Provider { .. }
            | ForecastError::Decode(_) => true,
            ForecastError::RetriesExhausted { .. } => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ForecastError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            ForecastError::Provider {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            ForecastError::Transport(error.to_string())
        }
    }
}

impl From<polars::error::PolarsError> for ForecastError {
    fn from(error: polars::error::PolarsError) -> Self {
        let forecast_error = match error {
            polars::error::PolarsError::ShapeMismatch(_) => {
                let err = ForecastError::DataFrame(format!("Shape mismatch: {}", error));
                error!(?err, "DataFrame error: Shape mismatch");
                err
            }
            polars::error::PolarsError::ColumnNotFound(_) => {
                let err = ForecastError::DataFrame(format!("Column not found: {}", error));
                error!(?err, "DataFrame error: Column not found");
                err
            }
            polars::error::PolarsError::Duplicate(_) => {
                let err = ForecastError::DataFrame(format!("Duplicate column: {}", error));
                error!(?err, "DataFrame error: Duplicate column");
                err
            }
            _ => {
                let err = ForecastError::DataFrame(error.to_string());
                error!(?err, "DataFrame error");
                err
            }
        };
        forecast_error
    }
}

/// Type alias for Result with ForecastError
pub type Result<T> = std::result::Result<T, ForecastError>;
