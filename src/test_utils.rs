#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use async_trait::async_trait;
    use axum::Router;
    use common::{
        CURRENT_VARIABLES, CurrentSnapshot, CurrentValue, DAILY_VARIABLES, ForecastHorizon,
        ForecastQuery, ForecastResponse, HOURLY_VARIABLES, SeriesBlock, VariableSeries,
        WeatherVariable,
    };
    use forecast::client::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};
    use forecast::{CachePolicy, ForecastClient, ForecastError, RetryConfig, wrap_client};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// First hour of every fake forecast (2024-06-01 00:00 Europe/Rome).
    pub const FAKE_START: i64 = 1_717_192_800;

    /// What the fake provider answers.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum FakeMode {
        /// A complete forecast for the requested horizon
        Healthy,
        /// Always a 503
        Unavailable,
        /// An hourly block with one value missing for `cloud_cover`
        Truncated,
    }

    /// Forecast client that never touches the network and counts calls.
    #[derive(Debug)]
    pub struct FakeForecastClient {
        mode: FakeMode,
        calls: AtomicU32,
    }

    impl FakeForecastClient {
        pub fn new(mode: FakeMode) -> Arc<Self> {
            Arc::new(Self {
                mode,
                calls: AtomicU32::new(0),
            })
        }

        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn block(
        variables: &[WeatherVariable],
        points: usize,
        interval: i64,
    ) -> SeriesBlock {
        SeriesBlock {
            start: FAKE_START,
            end: FAKE_START + points as i64 * interval,
            interval,
            variables: variables
                .iter()
                .enumerate()
                .map(|(offset, v)| {
                    VariableSeries::new(
                        v.name,
                        (0..points).map(|i| Some(offset as f64 * 10.0 + i as f64)).collect(),
                    )
                })
                .collect(),
        }
    }

    #[async_trait]
    impl ForecastClient for FakeForecastClient {
        async fn fetch(&self, query: &ForecastQuery) -> forecast::Result<ForecastResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.mode == FakeMode::Unavailable {
                return Err(ForecastError::Provider {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                });
            }

            let days = query.horizon.unwrap_or(ForecastHorizon::SEVEN_DAYS).days() as usize;
            let mut hourly = block(query.hourly, days * 24, 3_600);
            if self.mode == FakeMode::Truncated {
                if let Some(series) = hourly.variables.iter_mut().find(|v| v.name == "cloud_cover") {
                    series.values.pop();
                }
            }

            Ok(ForecastResponse {
                latitude: query.coordinate.latitude,
                longitude: query.coordinate.longitude,
                elevation: Some(322.0),
                timezone: Some("Europe/Rome".to_string()),
                utc_offset_seconds: 7200,
                current: Some(CurrentSnapshot {
                    time: FAKE_START,
                    interval: 900,
                    values: CURRENT_VARIABLES
                        .iter()
                        .map(|v| CurrentValue {
                            name: v.name.to_string(),
                            value: Some(if v.name == "is_day" { 1.0 } else { 21.3 }),
                        })
                        .collect(),
                }),
                hourly: Some(hourly),
                daily: Some(block(query.daily, days, 86_400)),
            })
        }
    }

    pub fn memory_cache() -> CachePolicy {
        CachePolicy::Memory {
            capacity: DEFAULT_CAPACITY,
            ttl: DEFAULT_TTL,
        }
    }

    /// Create AppState for testing around a fake provider.
    ///
    /// Retries keep the production attempt count with a 1 ms pause so
    /// failure tests stay fast.
    pub fn setup_test_app_state(fake: Arc<FakeForecastClient>, cache: CachePolicy) -> AppState {
        let kind = cache.kind();
        let client = wrap_client(fake, RetryConfig::new(5, Duration::from_millis(1)), &cache)
            .expect("Failed to build test client stack");

        AppState {
            client,
            cache: kind,
            horizons: ForecastHorizon::PAGE_HORIZONS.to_vec(),
        }
    }

    /// Install the test subscriber, writing to STDERR, as the global default.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set. Only the first call in a test binary
    /// installs it; later calls are no-ops.
    pub fn init_test_tracing() {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let _ = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Create axum app for testing
    pub fn setup_test_app(fake: Arc<FakeForecastClient>, cache: CachePolicy) -> Router {
        init_test_tracing();
        create_router(setup_test_app_state(fake, cache))
    }
}
