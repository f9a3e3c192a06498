//! Server-rendered HTML for the index page.
//!
//! One template serves both the empty form and the submitted state; chart
//! slots and the summary are only filled after a successful submission.

/// plotly.js bundle loaded by the page; chart fragments only call into it.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

/// One labelled value of the current-conditions summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryItem {
    pub label: &'static str,
    pub value: String,
}

/// Charts for one forecast horizon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSection {
    pub title: String,
    pub hourly_chart: Option<String>,
    pub daily_chart: Option<String>,
}

/// Everything the index template needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexPage {
    /// Submitted latitude, echoed back into the form
    pub latitude: String,
    /// Submitted longitude, echoed back into the form
    pub longitude: String,
    /// Short user-facing failure message
    pub error: Option<String>,
    /// Resolved location line, e.g. coordinates and timezone
    pub location: Option<String>,
    pub current: Vec<SummaryItem>,
    pub sections: Vec<ForecastSection>,
}

impl IndexPage {
    pub fn with_input(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            ..Default::default()
        }
    }
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Renders the full index document. Chart fragments are inserted verbatim,
/// everything else is escaped.
pub fn render_index(page: &IndexPage) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Weather Forecast</title>\n");
    html.push_str(&format!("<script src=\"{}\"></script>\n", PLOTLY_CDN));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n<main>\n<h1>Weather Forecast</h1>\n");

    html.push_str(&render_form(page));

    if let Some(error) = &page.error {
        html.push_str(&format!(
            "<div class=\"error\" role=\"alert\">{}</div>\n",
            escape_html(error)
        ));
    }

    if let Some(location) = &page.location {
        html.push_str(&format!("<p class=\"location\">{}</p>\n", escape_html(location)));
    }

    if !page.current.is_empty() {
        html.push_str("<section class=\"current\">\n<h2>Current conditions</h2>\n<dl>\n");
        for item in &page.current {
            html.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>\n",
                escape_html(item.label),
                escape_html(&item.value)
            ));
        }
        html.push_str("</dl>\n</section>\n");
    }

    for section in &page.sections {
        html.push_str(&format!(
            "<section class=\"forecast\">\n<h2>{}</h2>\n",
            escape_html(&section.title)
        ));
        for chart in [&section.hourly_chart, &section.daily_chart].into_iter().flatten() {
            html.push_str("<div class=\"chart\">\n");
            html.push_str(chart);
            html.push_str("\n</div>\n");
        }
        html.push_str("</section>\n");
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_form(page: &IndexPage) -> String {
    format!(
        concat!(
            "<form method=\"post\" action=\"/\">\n",
            "<label for=\"latitude\">Latitude</label>\n",
            "<input type=\"text\" id=\"latitude\" name=\"latitude\" placeholder=\"43.3182\" value=\"{}\" required>\n",
            "<label for=\"longitude\">Longitude</label>\n",
            "<input type=\"text\" id=\"longitude\" name=\"longitude\" placeholder=\"11.3306\" value=\"{}\" required>\n",
            "<button type=\"submit\">Get forecast</button>\n",
            "</form>\n"
        ),
        escape_html(&page.latitude),
        escape_html(&page.longitude)
    )
}

const STYLE: &str = r#"<style>
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f7fa; color: #1f2933; }
main { max-width: 1100px; margin: 0 auto; padding: 1.5rem; }
form { display: flex; flex-wrap: wrap; gap: 0.5rem; align-items: center; margin-bottom: 1rem; }
input { padding: 0.4rem; width: 9rem; }
button { padding: 0.45rem 1rem; }
.error { background: #fde8e8; border: 1px solid #f05252; padding: 0.75rem; border-radius: 4px; }
.current dl { display: grid; grid-template-columns: max-content auto; gap: 0.25rem 1rem; }
.chart { background: #fff; margin: 1rem 0; padding: 0.5rem; border-radius: 4px; }
</style>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("43.3182"), "43.3182");
    }

    #[test]
    fn test_idle_page_has_form_and_no_charts() {
        let html = render_index(&IndexPage::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("name=\"latitude\""));
        assert!(html.contains("name=\"longitude\""));
        assert!(html.contains(PLOTLY_CDN));
        assert!(!html.contains("class=\"chart\""));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_submitted_values_are_echoed_escaped() {
        let mut page = IndexPage::with_input("\"><b>", "11.3306");
        page.error = Some("latitude must be a decimal number, got '\"><b>'".to_string());
        let html = render_index(&page);

        assert!(html.contains("value=\"&quot;&gt;&lt;b&gt;\""));
        assert!(html.contains("value=\"11.3306\""));
        assert!(!html.contains("<b>"));
        assert!(html.contains("class=\"error\""));
    }

    #[test]
    fn test_sections_insert_chart_fragments_verbatim() {
        let page = IndexPage {
            current: vec![SummaryItem {
                label: "Temperature (°C)",
                value: "21.3".to_string(),
            }],
            sections: vec![ForecastSection {
                title: "Next 24 hours".to_string(),
                hourly_chart: Some("<div id=\"hourly-1d\"></div><script>draw()</script>".to_string()),
                daily_chart: None,
            }],
            ..IndexPage::with_input("43.3182", "11.3306")
        };
        let html = render_index(&page);

        assert!(html.contains("<h2>Next 24 hours</h2>"));
        assert!(html.contains("<div id=\"hourly-1d\"></div><script>draw()</script>"));
        assert_eq!(html.matches("class=\"chart\"").count(), 1);
        assert!(html.contains("<dt>Temperature (°C)</dt><dd>21.3</dd>"));
    }
}
