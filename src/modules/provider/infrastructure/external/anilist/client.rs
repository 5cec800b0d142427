use crate::modules::provider::domain::{
    AnimeProvider, CatalogCategory, CatalogEntry, CatalogPage, Recommendation, SearchFilters,
};
use crate::modules::provider::infrastructure::external::{CommonHttpHandler, RetryConfig};
use crate::modules::provider::traits::{AnimeProviderClient, RateLimiterInfo};
use crate::shared::config::{AppConfig, USER_AGENT};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{TimedOperation, Validator};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{
    dto::{AniListRequest, AniListResponse, MediaResponse, PageResponse, RecommendationsResponse},
    graphql::AniListQueries,
    mapper::AniListMapper,
};

/// Page size requested from AniList (its maximum is 50)
pub const ANILIST_PAGE_SIZE: u32 = 25;

/// AniList GraphQL client.
///
/// AniList calls go straight out; they are not routed through the Jikan queue.
pub struct AniListClient {
    client: Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl AniListClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Self::with_base_url(
            &config.anilist_base_url,
            config.http_timeout,
            RetryConfig::conservative(),
        )
    }

    pub fn with_base_url(
        base_url: &str,
        http_timeout: Duration,
        retry_config: RetryConfig,
    ) -> AppResult<Self> {
        let client = CommonHttpHandler::create_http_client(http_timeout, USER_AGENT)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_config,
        })
    }

    pub async fn list_by_category(
        &self,
        category: &CatalogCategory,
        page: u32,
    ) -> AppResult<CatalogPage> {
        Validator::validate_page(page)?;

        let variables = AniListQueries::category_variables(category, page, ANILIST_PAGE_SIZE);
        let response: PageResponse = self
            .query(AniListQueries::page_query(), variables, "list category")
            .await?
            .ok_or_else(|| AppError::ApiError("AniList response contained no data".to_string()))?;

        let result = AniListMapper::to_page(response.page, page);
        debug!(
            "AniList {} page {} returned {} entries",
            category,
            page,
            result.len()
        );
        Ok(result)
    }

    /// Get anime by AniList ID
    pub async fn get_anime_by_id(&self, anilist_id: i64) -> AppResult<Option<CatalogEntry>> {
        Validator::validate_anime_id(anilist_id)?;

        let response: Option<MediaResponse> = self
            .query(
                AniListQueries::media_query(),
                AniListQueries::media_variables(anilist_id),
                "get anime by ID",
            )
            .await?;

        Ok(response
            .and_then(|r| r.media)
            .map(AniListMapper::to_domain))
    }

    pub async fn search_anime(
        &self,
        filters: &SearchFilters,
        page: u32,
    ) -> AppResult<CatalogPage> {
        filters.validate()?;
        Validator::validate_page(page)?;

        let variables = AniListQueries::search_variables(filters, page, ANILIST_PAGE_SIZE);
        let response: PageResponse = self
            .query(AniListQueries::page_query(), variables, "search anime")
            .await?
            .ok_or_else(|| AppError::ApiError("AniList response contained no data".to_string()))?;

        Ok(AniListMapper::to_page(response.page, page))
    }

    pub async fn get_recommendations(&self, anilist_id: i64) -> AppResult<Vec<Recommendation>> {
        Validator::validate_anime_id(anilist_id)?;

        let response: Option<RecommendationsResponse> = self
            .query(
                AniListQueries::recommendations_query(),
                AniListQueries::recommendations_variables(anilist_id, ANILIST_PAGE_SIZE),
                "get recommendations",
            )
            .await?;

        Ok(response
            .and_then(|r| r.media)
            .map(|m| {
                m.recommendations
                    .nodes
                    .into_iter()
                    .filter_map(AniListMapper::to_recommendation)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Execute a GraphQL query with retry logic.
    ///
    /// Returns `Ok(None)` when AniList answers 404, which it does for an
    /// unknown media id.
    async fn query<T: DeserializeOwned>(
        &self,
        query: String,
        variables: Value,
        operation: &str,
    ) -> AppResult<Option<T>> {
        let timer = TimedOperation::new(&format!("AniList {}", operation));
        let request = AniListRequest {
            query,
            variables: Some(variables),
        };

        let response = match CommonHttpHandler::execute_with_retry(
            || self.client.post(&self.base_url).json(&request).send(),
            &self.retry_config,
            "AniList",
            operation,
        )
        .await
        {
            Ok(response) => response,
            Err(AppError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let anilist_response: AniListResponse<T> = response.json().await.map_err(|e| {
            AppError::SerializationError(format!("Failed to parse AniList response: {}", e))
        })?;

        if let Some(errors) = anilist_response.errors.filter(|e| !e.is_empty()) {
            if errors.iter().all(|e| e.status == Some(404)) {
                return Ok(None);
            }
            let error_messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(AppError::ApiError(format!(
                "AniList GraphQL errors: {}",
                error_messages.join(", ")
            )));
        }

        timer.finish();
        Ok(anilist_response.data)
    }
}

#[async_trait]
impl AnimeProviderClient for AniListClient {
    fn provider_type(&self) -> AnimeProvider {
        AnimeProvider::AniList
    }

    fn rate_limit_info(&self) -> Option<RateLimiterInfo> {
        None
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
