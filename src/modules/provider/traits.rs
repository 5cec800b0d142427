use crate::modules::provider::domain::{
    AnimeProvider, CatalogCategory, CatalogEntry, CatalogPage, Recommendation, SearchFilters,
};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Read-only catalog source
#[async_trait]
pub trait AnimeProviderClient: Send + Sync {
    /// Get the provider type this client handles
    fn provider_type(&self) -> AnimeProvider;

    /// Rate limit the client enforces on itself, if any
    fn rate_limit_info(&self) -> Option<RateLimiterInfo>;

    /// One page of a browsable category
    async fn list_by_category(&self, category: &CatalogCategory, page: u32)
        -> AppResult<CatalogPage>;

    /// Get anime by its id in this provider's id space; `None` when it doesn't exist
    async fn get_anime_by_id(&self, id: i64) -> AppResult<Option<CatalogEntry>>;

    /// Title search with filters
    async fn search_anime(&self, filters: &SearchFilters, page: u32) -> AppResult<CatalogPage>;

    /// Titles recommended by users who liked `id`
    async fn get_recommendations(&self, id: i64) -> AppResult<Vec<Recommendation>>;
}

/// Rate limiter information from the actual client implementation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimiterInfo {
    /// Requests per second
    pub requests_per_second: f64,
    /// Requests per minute (derived)
    pub requests_per_minute: u32,
    /// Minimum delay between request starts (in milliseconds)
    pub min_delay_ms: u32,
}

impl RateLimiterInfo {
    pub fn from_cooldown(cooldown: Duration) -> Self {
        let min_delay_ms = cooldown.as_millis() as u32;
        let requests_per_second = if min_delay_ms == 0 {
            f64::INFINITY
        } else {
            1000.0 / min_delay_ms as f64
        };
        Self {
            requests_per_second,
            requests_per_minute: (requests_per_second * 60.0).min(u32::MAX as f64) as u32,
            min_delay_ms,
        }
    }

    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_from_cooldown() {
        let info = RateLimiterInfo::from_cooldown(Duration::from_millis(500));
        assert_eq!(info.requests_per_second, 2.0);
        assert_eq!(info.requests_per_minute, 120);
        assert_eq!(info.min_delay(), Duration::from_millis(500));
    }
}
