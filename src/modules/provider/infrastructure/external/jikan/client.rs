use crate::modules::provider::domain::{
    AnimeProvider, CatalogCategory, CatalogEntry, CatalogPage, Recommendation, SearchFilters,
    SearchOrder,
};
use crate::modules::provider::infrastructure::external::{CommonHttpHandler, RetryConfig};
use crate::modules::provider::traits::{AnimeProviderClient, RateLimiterInfo};
use crate::shared::config::{AppConfig, USER_AGENT};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{RateLimitedQueue, TimedOperation, Validator};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::{
    dto::{
        JikanAnimeListResponse, JikanAnimeResponse, JikanRecommendationsResponse,
        JikanSearchParams,
    },
    mapper::JikanMapper,
};

/// Jikan max page size
pub const JIKAN_PAGE_SIZE: u32 = 25;

const NO_QUERY: [(&str, &str); 0] = [];

/// Jikan REST client.
///
/// Every HTTP call is a job on the client's [`RateLimitedQueue`], so calls
/// from any number of tasks go out one at a time, in order, spaced by the
/// queue's cooldown.
pub struct JikanClient {
    client: Client,
    base_url: String,
    queue: RateLimitedQueue,
    retry_config: RetryConfig,
}

impl JikanClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Self::with_queue(
            &config.jikan_base_url,
            config.http_timeout,
            RateLimitedQueue::new("Jikan", config.jikan_cooldown),
            RetryConfig::conservative(),
        )
    }

    pub fn with_queue(
        base_url: &str,
        http_timeout: Duration,
        queue: RateLimitedQueue,
        retry_config: RetryConfig,
    ) -> AppResult<Self> {
        let client = CommonHttpHandler::create_http_client(http_timeout, USER_AGENT)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            queue,
            retry_config,
        })
    }

    pub fn queue(&self) -> &RateLimitedQueue {
        &self.queue
    }

    pub async fn list_by_category(
        &self,
        category: &CatalogCategory,
        page: u32,
    ) -> AppResult<CatalogPage> {
        Validator::validate_page(page)?;

        let page_param = page.to_string();
        let limit_param = JIKAN_PAGE_SIZE.to_string();

        let response: JikanAnimeListResponse = match category {
            CatalogCategory::TopScored => {
                self.fetch(
                    "/top/anime",
                    vec![("page", page_param), ("limit", limit_param)],
                    "get top anime",
                )
                .await?
            }
            CatalogCategory::MostPopular => {
                self.fetch(
                    "/top/anime",
                    vec![
                        ("filter", "bypopularity".to_string()),
                        ("page", page_param),
                        ("limit", limit_param),
                    ],
                    "get popular anime",
                )
                .await?
            }
            CatalogCategory::Airing => {
                self.fetch(
                    "/top/anime",
                    vec![
                        ("filter", "airing".to_string()),
                        ("page", page_param),
                        ("limit", limit_param),
                    ],
                    "get airing anime",
                )
                .await?
            }
            CatalogCategory::Upcoming => {
                self.fetch(
                    "/seasons/upcoming",
                    vec![("page", page_param), ("limit", limit_param)],
                    "get upcoming anime",
                )
                .await?
            }
            CatalogCategory::CurrentSeason => {
                self.fetch(
                    "/seasons/now",
                    vec![("page", page_param), ("limit", limit_param)],
                    "get current season",
                )
                .await?
            }
            CatalogCategory::Seasonal { year, season } => {
                self.fetch(
                    &format!("/seasons/{}/{}", year, season.as_jikan()),
                    vec![("page", page_param), ("limit", limit_param)],
                    "get seasonal anime",
                )
                .await?
            }
            CatalogCategory::ByGenre { genre } => {
                let params = JikanSearchParams {
                    page: Some(page),
                    genres: Some(genre.mal_id.to_string()),
                    order_by: Some("score".to_string()),
                    sort: Some("desc".to_string()),
                    ..Default::default()
                };
                self.fetch("/anime", params, "get anime by genre").await?
            }
        };

        let result = JikanMapper::to_page(response, page);
        debug!(
            "Jikan {} page {} returned {} entries",
            category,
            page,
            result.len()
        );
        Ok(result)
    }

    pub async fn get_anime_by_id(&self, mal_id: i64) -> AppResult<Option<CatalogEntry>> {
        Validator::validate_anime_id(mal_id)?;

        let response: JikanAnimeResponse = match self
            .fetch(&format!("/anime/{}", mal_id), NO_QUERY, "get anime by ID")
            .await
        {
            Ok(response) => response,
            Err(AppError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(Some(JikanMapper::to_domain(response.data)))
    }

    pub async fn search_anime(
        &self,
        filters: &SearchFilters,
        page: u32,
    ) -> AppResult<CatalogPage> {
        filters.validate()?;
        Validator::validate_page(page)?;

        let params = Self::search_params(filters, page);
        let response: JikanAnimeListResponse =
            self.fetch("/anime", params, "search anime").await?;

        Ok(JikanMapper::to_page(response, page))
    }

    pub async fn get_recommendations(&self, mal_id: i64) -> AppResult<Vec<Recommendation>> {
        Validator::validate_anime_id(mal_id)?;

        let response: JikanRecommendationsResponse = self
            .fetch(
                &format!("/anime/{}/recommendations", mal_id),
                NO_QUERY,
                "get recommendations",
            )
            .await?;

        Ok(response
            .data
            .into_iter()
            .map(JikanMapper::to_recommendation)
            .collect())
    }

    fn search_params(filters: &SearchFilters, page: u32) -> JikanSearchParams {
        let (order_by, sort) = match filters.order {
            SearchOrder::Relevance => (None, None),
            SearchOrder::Score => (Some("score"), Some("desc")),
            // Jikan's popularity is a rank, lower is more popular
            SearchOrder::Popularity => (Some("popularity"), Some("asc")),
            SearchOrder::Title => (Some("title"), Some("asc")),
            SearchOrder::StartDate => (Some("start_date"), Some("desc")),
        };

        JikanSearchParams {
            q: Some(filters.normalized_query().to_string()),
            page: Some(page),
            limit: Some(JIKAN_PAGE_SIZE),
            anime_type: filters
                .format
                .and_then(|f| f.as_jikan())
                .map(str::to_string),
            status: filters
                .status
                .and_then(|s| s.as_jikan_filter())
                .map(str::to_string),
            min_score: filters.min_score,
            genres: filters.genre.as_ref().map(|g| g.mal_id.to_string()),
            order_by: order_by.map(str::to_string),
            sort: sort.map(str::to_string),
            sfw: Some(true),
        }
    }

    /// Submit one GET request to the queue and decode its JSON body
    async fn fetch<T, Q>(&self, path: &str, query: Q, operation: &'static str) -> AppResult<T>
    where
        T: DeserializeOwned + Send + 'static,
        Q: Serialize + Send + Sync + 'static,
    {
        let client = self.client.clone();
        let url = format!("{}{}", self.base_url, path);
        let retry_config = self.retry_config.clone();

        self.queue
            .submit(move || async move {
                let timer = TimedOperation::new(&format!("Jikan {}", operation));
                let response = CommonHttpHandler::execute_with_retry(
                    || client.get(&url).query(&query).send(),
                    &retry_config,
                    "Jikan",
                    operation,
                )
                .await?;

                let parsed = response.json::<T>().await.map_err(|e| {
                    AppError::SerializationError(format!("Failed to parse Jikan response: {}", e))
                })?;
                timer.finish();
                Ok(parsed)
            })
            .await
    }
}

#[async_trait]
impl AnimeProviderClient for JikanClient {
    fn provider_type(&self) -> AnimeProvider {
        AnimeProvider::Jikan
    }

    fn rate_limit_info(&self) -> Option<RateLimiterInfo> {
        Some(RateLimiterInfo::from_cooldown(self.queue.cooldown()))
    }

    async fn list_by_category(
        &self,
        category: &CatalogCategory,
        page: u32,
    ) -> AppResult<CatalogPage> {
        self.list_by_category(category, page).await
    }

    async fn get_anime_by_id(&self, id: i64) -> AppResult<Option<CatalogEntry>> {
        self.get_anime_by_id(id).await
    }

    async fn search_anime(&self, filters: &SearchFilters, page: u32) -> AppResult<CatalogPage> {
        self.search_anime(filters, page).await
    }

    async fn get_recommendations(&self, id: i64) -> AppResult<Vec<Recommendation>> {
        self.get_recommendations(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::provider::domain::{AnimeStatus, GenreRef, MediaFormat};

    #[test]
    fn test_search_params_from_filters() {
        let filters = SearchFilters::new(" bocchi ")
            .with_format(MediaFormat::TV)
            .with_status(AnimeStatus::Finished)
            .with_genre(GenreRef::new(4, "Comedy"))
            .with_order(SearchOrder::Popularity);

        let params = JikanClient::search_params(&filters, 2);
        assert_eq!(params.q.as_deref(), Some("bocchi"));
        assert_eq!(params.page, Some(2));
        assert_eq!(params.anime_type.as_deref(), Some("tv"));
        assert_eq!(params.status.as_deref(), Some("complete"));
        assert_eq!(params.genres.as_deref(), Some("4"));
        assert_eq!(params.order_by.as_deref(), Some("popularity"));
        assert_eq!(params.sort.as_deref(), Some("asc"));
    }

    #[test]
    fn test_relevance_order_sends_no_sort() {
        let params = JikanClient::search_params(&SearchFilters::new("k-on"), 1);
        assert_eq!(params.order_by, None);
        assert_eq!(params.sort, None);
        assert_eq!(params.sfw, Some(true));
    }
}
