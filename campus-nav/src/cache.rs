//! Caching layer for directions lookups.
//!
//! Coordinates are rounded to a fixed number of decimal places before being
//! used as a key, so two requests a few centimetres apart share an entry.
//! Only successful routes are cached; errors and "no route" answers always
//! go back to the provider on the next call.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::directions::{DirectionsError, DirectionsProvider};
use crate::domain::{Coordinate, DirectionsResult, TravelMode};

/// Cache key: (origin lat, origin lng, destination lat, destination lng, mode),
/// with coordinates scaled by `10^precision` and rounded.
type RouteKey = (i64, i64, i64, i64, TravelMode);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,

    /// Decimal places kept when rounding coordinates for the key.
    pub precision: u32,
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 500,
            precision: 5,
        }
    }
}

/// Directions provider with caching.
///
/// Wraps any `DirectionsProvider` and caches its successful routes.
pub struct CachedProvider<P> {
    inner: P,
    routes: MokaCache<RouteKey, DirectionsResult>,
    scale: f64,
}

impl<P> CachedProvider<P> {
    /// Create a new cached provider.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            routes,
            scale: 10f64.powi(config.precision as i32),
        }
    }

    fn round(&self, value: f64) -> i64 {
        (value * self.scale).round() as i64
    }

    fn key(&self, origin: Coordinate, destination: Coordinate, mode: TravelMode) -> RouteKey {
        (
            self.round(origin.latitude),
            self.round(origin.longitude),
            self.round(destination.latitude),
            self.round(destination.longitude),
            mode,
        )
    }

    /// Access the underlying provider for calls that bypass the cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}

impl<P: DirectionsProvider> DirectionsProvider for CachedProvider<P> {
    async fn get_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<DirectionsResult>, DirectionsError> {
        let key = self.key(origin, destination, mode);

        if let Some(cached) = self.routes.get(&key).await {
            debug!(%origin, %destination, %mode, "directions cache hit");
            return Ok(Some(cached));
        }

        let result = self.inner.get_directions(origin, destination, mode).await?;
        if let Some(route) = &result {
            self.routes.insert(key, route.clone()).await;
        }
        Ok(result)
    }
}
