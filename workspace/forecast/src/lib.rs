pub mod client;
pub mod error;
pub mod table;

use std::sync::Arc;

pub use client::ForecastClient;
pub use client::cache::{CachePolicy, CacheStore, CachedForecastClient};
pub use client::open_meteo::{DEFAULT_ENDPOINT, OpenMeteoClient};
pub use client::retry::{RetryConfig, RetryingForecastClient};
pub use error::{ForecastError, Result};

/// How the production client stack is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// Forecast endpoint URL
    pub endpoint: String,
    pub retry: RetryConfig,
    pub cache: CachePolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry: RetryConfig::default(),
            cache: CachePolicy::default(),
        }
    }
}

/// Wraps `inner` with retries and, unless disabled, a response cache.
///
/// The cache sits outside the retries so a hit never reaches the provider
/// and a cached entry is only written once a retried call has succeeded.
pub fn wrap_client<T: ForecastClient + 'static>(
    inner: T,
    retry: RetryConfig,
    cache: &CachePolicy,
) -> Result<Arc<dyn ForecastClient>> {
    let retrying = RetryingForecastClient::new(inner, retry);

    let client: Arc<dyn ForecastClient> = match cache {
        CachePolicy::Disabled => Arc::new(retrying),
        CachePolicy::Memory { capacity, ttl } => Arc::new(CachedForecastClient::new_with_store(
            retrying,
            CacheStore::memory(*capacity, *ttl),
        )),
        CachePolicy::Disk { dir, ttl } => Arc::new(CachedForecastClient::new_with_store(
            retrying,
            CacheStore::disk(dir, *ttl)?,
        )),
    };

    Ok(client)
}

/// Returns the client used by the application: cache over retry over the
/// Open-Meteo HTTP client.
pub fn default_client(options: &ClientOptions) -> Result<Arc<dyn ForecastClient>> {
    let http = OpenMeteoClient::new(options.endpoint.clone())?;
    wrap_client(http, options.retry.clone(), &options.cache)
}
