use async_trait::async_trait;
use common::{ForecastQuery, ForecastResponse};
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::Result;

pub mod cache;
pub mod open_meteo;
pub mod retry;

/// Source of raw forecast data.
///
/// Implementations either talk to the provider directly
/// ([`open_meteo::OpenMeteoClient`]) or decorate another client
/// ([`retry::RetryingForecastClient`], [`cache::CachedForecastClient`]).
#[async_trait]
pub trait ForecastClient: Send + Sync + Debug {
    /// Issue one logical request for the given query.
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse>;
}

#[async_trait]
impl<T: ForecastClient + ?Sized> ForecastClient for Box<T> {
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse> {
        (**self).fetch(query).await
    }
}

#[async_trait]
impl<T: ForecastClient + ?Sized> ForecastClient for Arc<T> {
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse> {
        (**self).fetch(query).await
    }
}
