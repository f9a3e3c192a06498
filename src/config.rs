use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use common::ForecastHorizon;
use forecast::client::cache::{DEFAULT_CACHE_DIR, DEFAULT_CAPACITY};
use forecast::{CachePolicy, ClientOptions, DEFAULT_ENDPOINT, RetryConfig, default_client};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::schemas::AppState;

/// Where provider responses are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackend {
    Disk,
    Memory,
    Off,
}

/// Runtime settings, read from arguments with environment fallbacks.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Interface the web server binds to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the web server listens on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Cache backend for provider responses
    #[arg(long, env = "CACHE_BACKEND", value_enum, default_value_t = CacheBackend::Disk)]
    pub cache_backend: CacheBackend,

    /// Directory of the disk cache
    #[arg(long, env = "CACHE_DIR", default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Seconds a cached response stays fresh
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Run without any cache (set automatically on Vercel)
    #[arg(long, env = "SERVERLESS")]
    pub serverless: bool,

    /// Forecast endpoint
    #[arg(long, env = "FORECAST_API_URL", default_value = DEFAULT_ENDPOINT)]
    pub forecast_api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cache_backend: CacheBackend::Disk,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache_ttl_secs: 3600,
            serverless: false,
            forecast_api_url: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Settings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Serverless platforms give no writable, persistent storage between
    /// invocations; Vercel is recognised by its `VERCEL` variable.
    pub fn is_serverless(&self) -> bool {
        self.serverless || std::env::var_os("VERCEL").is_some()
    }

    pub fn cache_policy(&self, serverless: bool) -> CachePolicy {
        if serverless {
            return CachePolicy::Disabled;
        }

        let ttl = Duration::from_secs(self.cache_ttl_secs.max(1));
        match self.cache_backend {
            CacheBackend::Disk => CachePolicy::Disk {
                dir: self.cache_dir.clone(),
                ttl,
            },
            CacheBackend::Memory => CachePolicy::Memory {
                capacity: DEFAULT_CAPACITY,
                ttl,
            },
            CacheBackend::Off => CachePolicy::Disabled,
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            endpoint: self.forecast_api_url.clone(),
            retry: RetryConfig::default(),
            cache: self.cache_policy(self.is_serverless()),
        }
    }
}

/// Initialize application state from settings
pub fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    let options = settings.client_options();
    info!(
        "Forecast endpoint: {}, cache: {}",
        options.endpoint,
        options.cache.kind()
    );

    let client = default_client(&options).context("Failed to build forecast client")?;

    Ok(AppState {
        client,
        cache: options.cache.kind(),
        horizons: ForecastHorizon::PAGE_HORIZONS.to_vec(),
    })
}
