//! Turns a provider series block into a polars table.
//!
//! The table has a `date` column (`Datetime[ms]`, UTC) generated from the
//! block's `[start, end)` range and interval, followed by one `Float64`
//! column per variable in the order the block lists them.

use chrono::{DateTime, Utc};
use common::SeriesBlock;
use polars::prelude::*;
use tracing::{debug, instrument};

use crate::error::{ForecastError, Result};

/// Name of the generated timestamp column.
pub const DATE_COLUMN: &str = "date";

/// Timestamps (epoch seconds) covering `[start, end)` stepped by `interval`.
pub fn generate_timestamps(start: i64, end: i64, interval: i64) -> Result<Vec<i64>> {
    if interval <= 0 || end < start {
        return Err(ForecastError::InvalidInterval {
            start,
            end,
            interval,
        });
    }

    Ok((start..end).step_by(interval as usize).collect())
}

/// Builds the time series table for one block.
///
/// Every variable array must be exactly as long as the generated timestamp
/// axis; a mismatch is reported as [`ForecastError::ShapeMismatch`] before
/// anything is built.
#[instrument(skip(block), fields(start = block.start, end = block.end, interval = block.interval))]
pub fn build_table(block: &SeriesBlock) -> Result<DataFrame> {
    let timestamps = generate_timestamps(block.start, block.end, block.interval)?;
    let expected = timestamps.len();

    for variable in &block.variables {
        if variable.values.len() != expected {
            return Err(ForecastError::ShapeMismatch {
                variable: variable.name.clone(),
                expected,
                actual: variable.values.len(),
            });
        }
    }

    let millis: Vec<i64> = timestamps.iter().map(|t| t * 1000).collect();
    let date = Series::new(DATE_COLUMN.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

    let mut columns: Vec<Column> = Vec::with_capacity(block.variables.len() + 1);
    columns.push(date.into());
    for variable in &block.variables {
        columns.push(Series::new(variable.name.as_str().into(), variable.values.clone()).into());
    }

    let df = DataFrame::new(columns)?;
    debug!(rows = df.height(), columns = df.width(), "Forecast table built");
    Ok(df)
}

/// Reads the `date` column back as UTC timestamps.
pub fn timestamps(df: &DataFrame) -> Result<Vec<DateTime<Utc>>> {
    let column = df.column(DATE_COLUMN)?.cast(&DataType::Int64)?;

    (0..column.len())
        .map(|i| -> Result<DateTime<Utc>> {
            let millis = column.get(i)?.try_extract::<i64>()?;
            DateTime::from_timestamp_millis(millis).ok_or_else(|| {
                ForecastError::DataFrame(format!("Invalid timestamp at row {}: {}", i, millis))
            })
        })
        .collect()
}

/// Reads a numeric column; nulls come back as `None`.
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?;

    (0..column.len())
        .map(|i| -> Result<Option<f64>> {
            match column.get(i)? {
                AnyValue::Null => Ok(None),
                value => Ok(Some(value.try_extract::<f64>()?)),
            }
        })
        .collect()
}

/// Names of the variable columns, timestamp column excluded.
pub fn variable_columns(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != DATE_COLUMN)
        .map(|name| name.to_string())
        .collect()
}
