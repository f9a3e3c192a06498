use serde::{Deserialize, Serialize};

/// Values of one variable across a series block, aligned with the block's
/// generated timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl VariableSeries {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// One resolution tier (hourly or daily) of a provider response.
///
/// Timestamps are not stored; they are regenerated from `[start, end)`
/// stepped by `interval`, all in UTC epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesBlock {
    pub start: i64,
    /// Exclusive
    pub end: i64,
    pub interval: i64,
    pub variables: Vec<VariableSeries>,
}

impl SeriesBlock {
    /// Number of timestamps in `[start, end)`, `None` for a degenerate interval.
    pub fn expected_len(&self) -> Option<usize> {
        if self.interval <= 0 || self.end < self.start {
            return None;
        }
        let span = self.end - self.start;
        usize::try_from((span + self.interval - 1) / self.interval).ok()
    }

    pub fn variable(&self, name: &str) -> Option<&VariableSeries> {
        self.variables.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentValue {
    pub name: String,
    pub value: Option<f64>,
}

/// Current-conditions snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    /// UTC epoch seconds
    pub time: i64,
    pub interval: i64,
    pub values: Vec<CurrentValue>,
}

impl CurrentSnapshot {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|v| v.name == name).and_then(|v| v.value)
    }
}

/// Raw forecast for one query, already split per resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub timezone: Option<String>,
    pub utc_offset_seconds: i64,
    pub current: Option<CurrentSnapshot>,
    pub hourly: Option<SeriesBlock>,
    pub daily: Option<SeriesBlock>,
}
