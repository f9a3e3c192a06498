use common::{ForecastApiResponse, ForecastDto, ForecastHorizon, ForecastRow};
use forecast::ForecastClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Forecast client stack (cache, retry, HTTP)
    pub client: Arc<dyn ForecastClient>,
    /// Name of the active cache backend
    pub cache: &'static str,
    /// Horizons rendered on the index page, in order
    pub horizons: Vec<ForecastHorizon>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Active cache backend (`memory`, `disk` or `disabled`)
    pub cache: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::forecast::get_forecast,
    ),
    components(
        schemas(
            ForecastApiResponse,
            ErrorResponse,
            HealthResponse,
            ForecastDto,
            ForecastRow,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "forecast", description = "Weather forecast endpoints"),
    ),
    info(
        title = "meteochart API",
        description = "Weather forecasts from Open-Meteo as tables and charts",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
