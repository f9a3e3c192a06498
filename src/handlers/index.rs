use axum::{
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use chart::{ChartError, ChartOptions, render_chart, series_for};
use common::{
    Coordinate, CoordinateError, DAILY_VARIABLES, ForecastHorizon, ForecastQuery,
    HOURLY_VARIABLES, SeriesBlock, WeatherVariable,
};
use forecast::ForecastError;
use forecast::table::build_table;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::helpers::converters::{describe_location, summarize_current};
use crate::schemas::AppState;
use crate::templates::{ForecastSection, IndexPage, render_index};

/// Submitted form fields; both optional so a missing field reaches the
/// handler instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct CoordinateForm {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Failures of a forecast request, each with its own status code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    InvalidCoordinates(#[from] CoordinateError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCoordinates(_) => StatusCode::BAD_REQUEST,
            AppError::Forecast(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            AppError::Forecast(_) | AppError::Chart(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine readable code used by the JSON API.
    pub fn code(&self) -> &'static str {
        match self.status() {
            StatusCode::BAD_REQUEST => "INVALID_QUERY",
            StatusCode::BAD_GATEWAY => "UPSTREAM_ERROR",
            _ => "TABLE_ERROR",
        }
    }

    /// Message safe to show to the user; details stay in the log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCoordinates(e) => format!("Invalid coordinates: {}", e),
            AppError::Forecast(e) if e.is_upstream() => {
                "The weather service could not be reached. Please try again in a moment."
                    .to_string()
            }
            AppError::Forecast(_) | AppError::Chart(_) => {
                "The forecast data could not be charted.".to_string()
            }
        }
    }

    /// Renders `page` with this error in place of the charts.
    pub fn into_page(self, mut page: IndexPage) -> Response {
        page.error = Some(self.user_message());
        page.current.clear();
        page.sections.clear();
        page.location = None;
        (self.status(), Html(render_index(&page))).into_response()
    }
}

/// Index page with an empty form
#[instrument]
pub async fn index_page() -> Html<String> {
    Html(render_index(&IndexPage::default()))
}

/// Form submission: fetch every horizon and render its charts
#[instrument(skip(state, form))]
pub async fn submit_forecast(
    State(state): State<AppState>,
    form: Result<Form<CoordinateForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            error!("Unreadable form submission: {}", rejection.body_text());
            let page = IndexPage {
                error: Some("The submitted form could not be read.".to_string()),
                ..IndexPage::default()
            };
            return (StatusCode::BAD_REQUEST, Html(render_index(&page))).into_response();
        }
    };

    let mut page = IndexPage::with_input(
        form.latitude.clone().unwrap_or_default(),
        form.longitude.clone().unwrap_or_default(),
    );

    match fill_page(&state, &form, &mut page).await {
        Ok(()) => (StatusCode::OK, Html(render_index(&page))).into_response(),
        Err(e) => {
            error!("Forecast page failed: {}", e);
            e.into_page(page)
        }
    }
}

async fn fill_page(state: &AppState, form: &CoordinateForm, page: &mut IndexPage) -> Result<(), AppError> {
    let coordinate = Coordinate::parse(form.latitude.as_deref(), form.longitude.as_deref())?;
    info!("Forecast requested for {}", coordinate);

    for horizon in &state.horizons {
        let query = ForecastQuery::standard(coordinate, Some(*horizon));
        let response = state.client.fetch(&query).await?;

        if page.location.is_none() {
            page.location = Some(describe_location(&response));
        }
        if page.current.is_empty() {
            if let Some(current) = &response.current {
                page.current = summarize_current(current);
            }
        }

        page.sections.push(ForecastSection {
            title: horizon.title(),
            hourly_chart: chart_block(response.hourly.as_ref(), HOURLY_VARIABLES, "hourly", "Hourly", *horizon)?,
            daily_chart: chart_block(response.daily.as_ref(), DAILY_VARIABLES, "daily", "Daily", *horizon)?,
        });
    }

    debug!(sections = page.sections.len(), "Forecast page filled");
    Ok(())
}

fn chart_block(
    block: Option<&SeriesBlock>,
    variables: &[WeatherVariable],
    id_prefix: &str,
    title_prefix: &str,
    horizon: ForecastHorizon,
) -> Result<Option<String>, AppError> {
    let Some(block) = block else {
        return Ok(None);
    };

    let df = build_table(block)?;
    let options = ChartOptions::new(
        format!("{}-{}", id_prefix, horizon),
        format!("{} forecast, {}", title_prefix, horizon.title().to_lowercase()),
    );
    Ok(Some(render_chart(&df, &series_for(variables), &options)?))
}
