use async_trait::async_trait;
use cached::{Cached, DiskCache, IOCached, TimedSizedCache};
use common::{ForecastQuery, ForecastResponse};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::ForecastClient;
use crate::error::{ForecastError, Result};

/// Provider responses stay fresh for one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
/// Upper bound on in-memory entries.
pub const DEFAULT_CAPACITY: usize = 1000;
/// Directory of the on-disk store, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

const DISK_CACHE_NAME: &str = "forecast_responses";

/// Where cached provider responses are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachePolicy {
    /// No caching at all, every query reaches the provider
    Disabled,
    Memory { capacity: usize, ttl: Duration },
    Disk { dir: PathBuf, ttl: Duration },
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy::Disk {
            dir: PathBuf::from(DEFAULT_CACHE_DIR),
            ttl: DEFAULT_TTL,
        }
    }
}

impl CachePolicy {
    pub fn kind(&self) -> &'static str {
        match self {
            CachePolicy::Disabled => "disabled",
            CachePolicy::Memory { .. } => "memory",
            CachePolicy::Disk { .. } => "disk",
        }
    }
}

/// Backing store of a [`CachedForecastClient`].
pub enum CacheStore {
    Memory(Mutex<TimedSizedCache<String, ForecastResponse>>),
    Disk(DiskCache<String, ForecastResponse>),
}

impl CacheStore {
    pub fn memory(capacity: usize, ttl: Duration) -> Self {
        CacheStore::Memory(Mutex::new(TimedSizedCache::with_size_and_lifespan(
            capacity.max(1),
            ttl.as_secs().max(1),
        )))
    }

    /// Open (or create) the on-disk store under `dir`.
    pub fn disk(dir: &Path, ttl: Duration) -> Result<Self> {
        let store = DiskCache::new(DISK_CACHE_NAME)
            .set_disk_directory(dir)
            .set_lifespan(ttl.as_secs().max(1))
            .build()
            .map_err(|e| {
                ForecastError::Cache(format!(
                    "Failed to open disk cache in {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        Ok(CacheStore::Disk(store))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CacheStore::Memory(_) => "memory",
            CacheStore::Disk(_) => "disk",
        }
    }

    fn get(&self, key: &String) -> Option<ForecastResponse> {
        match self {
            CacheStore::Memory(cache) => match cache.lock() {
                Ok(mut cache) => cache.cache_get(key).cloned(),
                Err(e) => {
                    warn!("Memory cache lock poisoned, treating as miss: {}", e);
                    None
                }
            },
            CacheStore::Disk(cache) => match cache.cache_get(key) {
                Ok(hit) => hit,
                Err(e) => {
                    warn!("Disk cache read failed, treating as miss: {}", e);
                    None
                }
            },
        }
    }

    fn set(&self, key: String, value: ForecastResponse) {
        match self {
            CacheStore::Memory(cache) => match cache.lock() {
                Ok(mut cache) => {
                    cache.cache_set(key, value);
                }
                Err(e) => warn!("Memory cache lock poisoned, write skipped: {}", e),
            },
            CacheStore::Disk(cache) => {
                if let Err(e) = cache.cache_set(key, value) {
                    warn!("Disk cache write failed: {}", e);
                }
            }
        }
    }

    /// Number of live in-memory entries; `None` for the disk store.
    pub fn len(&self) -> Option<usize> {
        match self {
            CacheStore::Memory(cache) => cache.lock().ok().map(|cache| cache.cache_size()),
            CacheStore::Disk(_) => None,
        }
    }

    pub fn clear(&self) {
        match self {
            CacheStore::Memory(cache) => {
                if let Ok(mut cache) = cache.lock() {
                    cache.cache_clear();
                }
            }
            CacheStore::Disk(_) => {
                debug!("Disk cache entries are left to expire on their own");
            }
        }
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheStore").field(&self.kind()).finish()
    }
}

/// A caching wrapper for ForecastClient implementations.
///
/// Successful responses are stored under the query's cache key; failures are
/// never cached. A hit returns the stored response without calling the
/// wrapped client.
#[derive(Debug)]
pub struct CachedForecastClient<T: ForecastClient> {
    /// The wrapped client
    inner: T,
    store: CacheStore,
}

impl<T: ForecastClient> CachedForecastClient<T> {
    pub fn new_with_store(inner: T, store: CacheStore) -> Self {
        Self { inner, store }
    }

    /// In-memory cache with the default capacity and a one hour TTL.
    pub fn with_defaults(inner: T) -> Self {
        Self::new_with_store(inner, CacheStore::memory(DEFAULT_CAPACITY, DEFAULT_TTL))
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Drops every in-memory entry.
    pub fn clear_cache(&self) {
        self.store.clear();
    }
}

#[async_trait]
impl<T: ForecastClient> ForecastClient for CachedForecastClient<T> {
    #[instrument(skip(self, query), fields(coordinate = %query.coordinate, store = self.store.kind()))]
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse> {
        let cache_key = query.cache_key();

        // Try to get from cache first
        if let Some(hit) = self.store.get(&cache_key) {
            debug!("Forecast cache hit");
            return Ok(hit);
        }

        debug!("Forecast cache miss");
        let response = self.inner.fetch(query).await?;

        self.store.set(cache_key, response.clone());

        Ok(response)
    }
}
