//! Catalog service implementation
//!
//! Provides pricing-rate lookup with Redis caching so quoting does not hit
//! the database on every request.

use fresco_cache::RedisCache;
use fresco_core::{
    models::{ServiceKind, ServiceRates},
    traits::{CacheService, PricingCatalog},
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::constants::RATES_CACHE_TTL;

/// Catalog service with caching
///
/// Wraps the pricing catalog repository and caches published rates per
/// service kind. Cache failures degrade to database lookups, never to
/// request failures.
pub struct CatalogService<R: PricingCatalog> {
    catalog: Arc<R>,
    cache: Arc<RedisCache>,
}

impl<R: PricingCatalog> CatalogService<R> {
    /// Create a new catalog service
    pub fn new(catalog: Arc<R>, cache: Arc<RedisCache>) -> Self {
        Self { catalog, cache }
    }

    /// Generate cache key for a service kind
    fn cache_key(kind: ServiceKind) -> String {
        fresco_cache::keys::rates_key(&kind.to_string())
    }

    /// Try to get rates from cache
    async fn get_from_cache(&self, kind: ServiceKind) -> Option<ServiceRates> {
        let key = Self::cache_key(kind);

        match self.cache.get::<ServiceRates>(&key).await {
            Ok(rates) => {
                if rates.is_some() {
                    debug!("Rates cache HIT for service kind: {}", kind);
                }
                rates
            }
            Err(e) => {
                warn!("Cache error for service kind {}: {}", kind, e);
                None
            }
        }
    }

    /// Store rates in cache
    async fn store_in_cache(&self, kind: ServiceKind, rates: &ServiceRates) {
        let key = Self::cache_key(kind);

        if let Err(e) = self.cache.set(&key, rates, RATES_CACHE_TTL).await {
            warn!("Failed to cache rates for {}: {}", kind, e);
        }
    }

    /// Rates for a service kind, `None` for unknown or unpublished entries
    #[instrument(skip(self))]
    pub async fn get_rates(&self, kind: ServiceKind) -> AppResult<Option<ServiceRates>> {
        debug!("Finding rates for service kind: {}", kind);

        // Try cache first
        if let Some(rates) = self.get_from_cache(kind).await {
            return Ok(Some(rates));
        }

        // Cache miss - query database
        debug!("Rates cache MISS for service kind: {}", kind);
        let rates = self.catalog.get_rates(kind).await?;

        // Store in cache for future lookups
        if let Some(ref r) = rates {
            self.store_in_cache(kind, r).await;
        }

        Ok(rates)
    }

    /// Rates for a service kind, failing when the catalog has no published
    /// entry
    #[instrument(skip(self))]
    pub async fn require_rates(&self, kind: ServiceKind) -> AppResult<ServiceRates> {
        self.get_rates(kind)
            .await?
            .ok_or_else(|| AppError::ServiceNotFound(kind.to_string()))
    }

    /// All published catalog entries, uncached
    #[instrument(skip(self))]
    pub async fn list_published(&self) -> AppResult<Vec<ServiceRates>> {
        self.catalog.list_published().await
    }
}
