use crate::modules::provider::domain::{
    AnimeProvider, CatalogCategory, CatalogEntry, CatalogPage, Recommendation, SearchFilters,
};
use crate::modules::provider::traits::AnimeProviderClient;
use crate::modules::settings::SettingsStore;
use crate::shared::application::PaginatedResult;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{LogContext, Validator};
use crate::{log_debug, log_warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Application service for catalog reads.
///
/// Routes each call to the client registered for the requested provider.
/// Browsing, search and recommendations degrade to an empty result when the
/// provider fails; detail lookups return the failure to the caller.
#[derive(Clone)]
pub struct CatalogService {
    providers: HashMap<AnimeProvider, Arc<dyn AnimeProviderClient>>,
    default_provider: AnimeProvider,
    settings: Option<Arc<SettingsStore>>,
}

impl CatalogService {
    pub fn new(default_provider: AnimeProvider) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider,
            settings: None,
        }
    }

    /// Register a client under the provider it reports
    pub fn with_provider(mut self, client: Arc<dyn AnimeProviderClient>) -> Self {
        self.providers.insert(client.provider_type(), client);
        self
    }

    /// Record searches in the local history
    pub fn with_settings(mut self, settings: Arc<SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn default_provider(&self) -> AnimeProvider {
        self.default_provider
    }

    pub fn available_providers(&self) -> Vec<AnimeProvider> {
        let mut providers: Vec<_> = self.providers.keys().copied().collect();
        providers.sort_by_key(|p| p.display_name());
        providers
    }

    pub fn client(&self, provider: Option<AnimeProvider>) -> AppResult<&Arc<dyn AnimeProviderClient>> {
        let provider = provider.unwrap_or(self.default_provider);
        self.providers.get(&provider).ok_or_else(|| {
            AppError::InvalidInput(format!("Provider {} is not configured", provider))
        })
    }

    pub async fn browse(
        &self,
        provider: Option<AnimeProvider>,
        category: &CatalogCategory,
        page: u32,
    ) -> AppResult<CatalogPage> {
        Validator::validate_page(page)?;
        let client = self.client(provider)?;

        match client.list_by_category(category, page).await {
            Ok(result) => Ok(result),
            Err(e) => {
                log_warn!(
                    "{} {} page {} failed, showing empty list: {}",
                    client.provider_type().display_name(),
                    category,
                    page,
                    e
                );
                Ok(PaginatedResult::empty(page))
            }
        }
    }

    pub async fn search(
        &self,
        provider: Option<AnimeProvider>,
        filters: &SearchFilters,
        page: u32,
    ) -> AppResult<CatalogPage> {
        filters.validate()?;
        Validator::validate_page(page)?;
        let client = self.client(provider)?;
        let provider_name = client.provider_type().display_name();

        if let Some(settings) = &self.settings {
            if let Err(e) = settings.record_search(filters.normalized_query()).await {
                log_warn!("Failed to record recent search: {}", e);
            }
        }

        match client.search_anime(filters, page).await {
            Ok(result) => {
                LogContext::search_operation(
                    filters.normalized_query(),
                    Some(provider_name),
                    Some(result.len()),
                );
                Ok(result)
            }
            Err(e) => {
                log_warn!(
                    "{} search for '{}' failed, showing no results: {}",
                    provider_name,
                    filters.normalized_query(),
                    e
                );
                Ok(PaginatedResult::empty(page))
            }
        }
    }

    pub async fn get_anime_details(
        &self,
        provider: Option<AnimeProvider>,
        id: i64,
    ) -> AppResult<Option<CatalogEntry>> {
        let client = self.client(provider)?;
        log_debug!(
            "Fetching details for {} from {}",
            id,
            client.provider_type().display_name()
        );
        client.get_anime_by_id(id).await
    }

    pub async fn recommendations(
        &self,
        provider: Option<AnimeProvider>,
        id: i64,
    ) -> AppResult<Vec<Recommendation>> {
        Validator::validate_anime_id(id)?;
        let client = self.client(provider)?;

        match client.get_recommendations(id).await {
            Ok(recommendations) => Ok(recommendations),
            Err(e) => {
                log_warn!(
                    "{} recommendations for {} failed: {}",
                    client.provider_type().display_name(),
                    id,
                    e
                );
                Ok(Vec::new())
            }
        }
    }
}
