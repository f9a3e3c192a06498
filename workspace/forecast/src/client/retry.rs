//! Fixed-delay retry around another [`ForecastClient`].
//!
//! Transport failures and retryable provider statuses (5xx, 429, 408) are
//! attempted again after a constant pause. Decode errors and other 4xx
//! statuses are returned immediately.

use async_trait::async_trait;
use common::{ForecastQuery, ForecastResponse};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::ForecastClient;
use crate::error::{ForecastError, Result};

/// Default retry configuration
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_DELAY_SECS: u64 = 2;

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, the first one included
    pub max_attempts: u32,
    /// Pause between two attempts
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_secs(DEFAULT_DELAY_SECS),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Retries the wrapped client according to a [`RetryConfig`].
#[derive(Debug)]
pub struct RetryingForecastClient<T: ForecastClient> {
    inner: T,
    config: RetryConfig,
}

impl<T: ForecastClient> RetryingForecastClient<T> {
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Wraps with 5 attempts and a 2 second pause.
    pub fn with_defaults(inner: T) -> Self {
        Self::new(inner, RetryConfig::default())
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

#[async_trait]
impl<T: ForecastClient> ForecastClient for RetryingForecastClient<T> {
    #[instrument(skip(self, query), fields(coordinate = %query.coordinate))]
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.inner.fetch(query).await {
                Ok(response) => {
                    if attempt > 1 {
                        info!("Forecast request succeeded on attempt {}", attempt);
                    }
                    return Ok(response);
                }
                Err(e) if !e.is_retryable() => {
                    debug!("Non-retryable error: {}", e);
                    return Err(e);
                }
                Err(e) if attempt >= max_attempts => {
                    error!("All {} attempts exhausted, last error: {}", attempt, e);
                    return Err(ForecastError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!(
                        "Retryable error on attempt {} of {}: {}; waiting {:?}",
                        attempt, max_attempts, e, self.config.delay
                    );
                    tokio::time::sleep(self.config.delay).await;
                }
            }
        }
    }
}
