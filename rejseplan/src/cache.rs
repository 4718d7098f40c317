//! Walking-route cache across searches.
//!
//! `CommonData` already collapses walking-route fetches within one response.
//! A long-lived caller running many searches can wrap its route source in
//! `CachedWalkingRoutes` to also reuse routes between responses.
//!
//! Route-context tokens are only promised stable within one response, so the
//! TTL bounds how stale a reused route can get.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::hafas::HafasError;
use crate::walking::{WalkingDetails, WalkingRouteSource};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 1000,
        }
    }
}

/// Route source with caching.
///
/// Only successful fetches that carry geometry are cached; failures and
/// empty responses go back to the inner source next time.
pub struct CachedWalkingRoutes<S> {
    inner: S,
    routes: MokaCache<String, Arc<WalkingDetails>>,
}

impl<S: WalkingRouteSource> CachedWalkingRoutes<S> {
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, routes }
    }

    /// Access the underlying source for operations that bypass cache.
    pub fn inner(&self) -> &S {
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

#[async_trait]
impl<S: WalkingRouteSource> WalkingRouteSource for CachedWalkingRoutes<S> {
    async fn walking_details(&self, context: &str) -> Result<WalkingDetails, HafasError> {
        if let Some(cached) = self.routes.get(context).await {
            debug!(ctx = %context, "walking route cache hit");
            return Ok(WalkingDetails::clone(&cached));
        }

        let details = self.inner.walking_details(context).await?;

        if details.polyline.as_ref().is_some_and(|p| !p.is_empty()) {
            self.routes
                .insert(context.to_string(), Arc::new(details.clone()))
                .await;
        }

        Ok(details)
    }
}
