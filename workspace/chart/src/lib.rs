//! Renders forecast tables as embeddable plotly line charts.

pub mod error;

use common::WeatherVariable;
use forecast::table;
use plotly::common::{Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};
use polars::prelude::DataFrame;
use tracing::{debug, instrument};

pub use error::{ChartError, Result};

/// Title of the shared time axis.
pub const X_AXIS_TITLE: &str = "Date and Time";
/// How timestamps are written on the x axis (UTC).
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const DEFAULT_HEIGHT: usize = 450;

/// Presentation settings of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Id of the `<div>` the chart is drawn into; must be unique per page
    pub div_id: String,
    pub title: String,
    pub y_title: Option<String>,
    pub height: usize,
}

impl ChartOptions {
    pub fn new(div_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            div_id: div_id.into(),
            title: title.into(),
            y_title: None,
            height: DEFAULT_HEIGHT,
        }
    }

    pub fn with_y_title(mut self, y_title: impl Into<String>) -> Self {
        self.y_title = Some(y_title.into());
        self
    }
}

/// `(column, label)` pairs for a variable set, in chart order.
pub fn series_for(variables: &[WeatherVariable]) -> Vec<(&'static str, &'static str)> {
    variables.iter().map(|v| (v.name, v.label)).collect()
}

/// Draws one line per selected column against the table's `date` column and
/// returns the chart as an HTML fragment, never a full document.
///
/// Null values are left as gaps in the line.
#[instrument(skip(df, series), fields(div_id = %options.div_id, series = series.len()))]
pub fn render_chart(
    df: &DataFrame,
    series: &[(&str, &str)],
    options: &ChartOptions,
) -> Result<String> {
    let x: Vec<String> = table::timestamps(df)?
        .iter()
        .map(|t| t.format(TIME_FORMAT).to_string())
        .collect();

    let mut plot = Plot::new();
    for (column, label) in series {
        if df.column(column).is_err() {
            return Err(ChartError::MissingColumn(column.to_string()));
        }
        let y = table::column_values(df, column)?;
        let trace = Scatter::new(x.clone(), y).mode(Mode::Lines).name(*label);
        plot.add_trace(trace);
    }

    let mut layout = Layout::new()
        .title(Title::with_text(options.title.as_str()))
        .x_axis(Axis::new().title(Title::with_text(X_AXIS_TITLE)))
        .height(options.height);
    if let Some(y_title) = &options.y_title {
        layout = layout.y_axis(Axis::new().title(Title::with_text(y_title.as_str())));
    }
    plot.set_layout(layout);

    debug!(points = x.len(), "Chart rendered");
    Ok(inline_fragment(&plot, options))
}

/// `<div>` plus the `<script>` drawing into it; plotly.js itself is loaded
/// by the page.
fn inline_fragment(plot: &Plot, options: &ChartOptions) -> String {
    // A literal "</" would close the script element early
    let json = plot.to_json().replace("</", "<\\/");
    format!(
        concat!(
            "<div id=\"{id}\" class=\"plotly-graph-div\" style=\"height:{height}px; width:100%;\"></div>\n",
            "<script type=\"text/javascript\">\n",
            "Plotly.newPlot(\"{id}\", {json});\n",
            "</script>"
        ),
        id = options.div_id,
        height = options.height,
        json = json,
    )
}
