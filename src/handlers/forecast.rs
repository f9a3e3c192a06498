use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
};
use axum_valid::{Valid, ValidRejection};
use common::{Coordinate, ForecastApiResponse, ForecastDto, ForecastHorizon, ForecastQuery};
use forecast::table::build_table;
use serde::Deserialize;
use tracing::{debug, error, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::handlers::index::AppError;
use crate::helpers::converters::convert_dataframe_to_dto;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

const DEFAULT_DAYS: u8 = 7;

/// Query parameters of the forecast endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ForecastApiQuery {
    /// Latitude in decimal degrees
    pub latitude: String,
    /// Longitude in decimal degrees
    pub longitude: String,
    /// Number of forecast days (default: 7)
    #[validate(range(min = 1, max = 16))]
    pub days: Option<u8>,
}

/// Get the hourly forecast table for a coordinate pair
#[utoipa::path(
    get,
    path = "/api/v1/forecast",
    tag = "forecast",
    params(ForecastApiQuery),
    responses(
        (status = 200, description = "Forecast retrieved successfully", body = ForecastApiResponse),
        (status = 400, description = "Invalid coordinates or days", body = ErrorResponse),
        (status = 502, description = "Forecast provider unavailable", body = ErrorResponse),
        (status = 500, description = "Forecast data could not be tabulated", body = ErrorResponse)
    )
)]
#[instrument(skip(query, state))]
pub async fn get_forecast(
    State(state): State<AppState>,
    query: Result<Valid<Query<ForecastApiQuery>>, ValidRejection<QueryRejection>>,
) -> Result<Json<ApiResponse<ForecastDto>>, (StatusCode, Json<ErrorResponse>)> {
    let Valid(Query(query)) = query.map_err(invalid_query)?;
    let days = query.days.unwrap_or(DEFAULT_DAYS);

    match load_forecast(&state, &query, days).await {
        Ok(dto) => {
            debug!("Returning {} forecast rows", dto.rows.len());
            Ok(Json(ApiResponse {
                data: dto,
                message: "Forecast retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(e) => {
            error!("Failed to load forecast: {}", e);
            Err((
                e.status(),
                Json(ErrorResponse::new(e.user_message(), e.code())),
            ))
        }
    }
}

fn invalid_query(rejection: ValidRejection<QueryRejection>) -> (StatusCode, Json<ErrorResponse>) {
    let message = match rejection {
        ValidRejection::Valid(errors) => errors.to_string(),
        ValidRejection::Inner(inner) => inner.body_text(),
    };
    debug!("Rejected forecast query: {}", message);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(message, "INVALID_QUERY")),
    )
}

async fn load_forecast(
    state: &AppState,
    query: &ForecastApiQuery,
    days: u8,
) -> Result<ForecastDto, AppError> {
    let coordinate = Coordinate::parse(Some(&query.latitude), Some(&query.longitude))?;
    // days is range-checked by the validator
    let horizon = ForecastHorizon::new(days).unwrap_or(ForecastHorizon::SEVEN_DAYS);

    let response = state
        .client
        .fetch(&ForecastQuery::standard(coordinate, Some(horizon)))
        .await?;

    let Some(hourly) = &response.hourly else {
        return Ok(ForecastDto {
            latitude: response.latitude,
            longitude: response.longitude,
            timezone: response.timezone.clone(),
            days,
            rows: Vec::new(),
        });
    };

    let df = build_table(hourly)?;
    Ok(convert_dataframe_to_dto(&df, &response, days)?)
}
