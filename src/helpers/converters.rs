use common::{CURRENT_VARIABLES, CurrentSnapshot, ForecastDto, ForecastResponse, ForecastRow};
use forecast::ForecastError;
use forecast::table::{column_values, timestamps, variable_columns};
use polars::prelude::DataFrame;
use std::collections::BTreeMap;

use crate::templates::SummaryItem;

/// Helper function to convert a forecast table to the JSON API shape
pub fn convert_dataframe_to_dto(
    df: &DataFrame,
    response: &ForecastResponse,
    days: u8,
) -> Result<ForecastDto, ForecastError> {
    let times = timestamps(df)?;
    let columns = variable_columns(df)
        .into_iter()
        .map(|name| column_values(df, &name).map(|values| (name, values)))
        .collect::<Result<Vec<_>, _>>()?;

    let rows = times
        .into_iter()
        .enumerate()
        .map(|(i, time)| {
            let values: BTreeMap<String, Option<f64>> = columns
                .iter()
                .map(|(name, values)| (name.clone(), values.get(i).copied().flatten()))
                .collect();
            ForecastRow { time, values }
        })
        .collect();

    Ok(ForecastDto {
        latitude: response.latitude,
        longitude: response.longitude,
        timezone: response.timezone.clone(),
        days,
        rows,
    })
}

/// Labelled, display-ready values of the current-conditions snapshot.
pub fn summarize_current(snapshot: &CurrentSnapshot) -> Vec<SummaryItem> {
    CURRENT_VARIABLES
        .iter()
        .map(|variable| {
            let value = match (variable.name, snapshot.value(variable.name)) {
                (_, None) => "n/a".to_string(),
                ("is_day", Some(flag)) if flag >= 1.0 => "Day".to_string(),
                ("is_day", Some(_)) => "Night".to_string(),
                (_, Some(value)) => format!("{:.1}", value),
            };
            SummaryItem {
                label: variable.label,
                value,
            }
        })
        .collect()
}

/// Location line shown above the charts.
pub fn describe_location(response: &ForecastResponse) -> String {
    let mut line = format!("Forecast for {:.4}, {:.4}", response.latitude, response.longitude);
    if let Some(elevation) = response.elevation {
        line.push_str(&format!(" ({:.0} m)", elevation));
    }
    if let Some(timezone) = &response.timezone {
        line.push_str(&format!(", timezone {}", timezone));
    }
    line
}
