pub mod cli;
pub mod modules;
pub mod shared;

use modules::{
    account::{AccountService, IdentityClient, IdentityProvider},
    collection::{DocumentStoreClient, WatchlistService},
    provider::{AniListClient, AnimeProvider, CatalogService, JikanClient},
    settings::SettingsStore,
};
use shared::errors::AppResult;
use shared::AppConfig;
use std::sync::Arc;

/// Services wired from one configuration.
///
/// The account and watchlist services exist only when both the identity API
/// key and the backend URL are configured.
pub struct AppContext {
    pub config: AppConfig,
    pub settings: Arc<SettingsStore>,
    pub catalog: CatalogService,
    pub account: Option<AccountService>,
    pub watchlist: Option<Arc<WatchlistService>>,
}

impl AppContext {
    /// Must be called from within a Tokio runtime; the Jikan queue spawns its
    /// drain task there.
    pub async fn initialize(config: AppConfig) -> AppResult<Self> {
        let settings = Arc::new(SettingsStore::open(config.settings_path.clone()).await?);

        let jikan = Arc::new(JikanClient::new(&config)?);
        let anilist = Arc::new(AniListClient::new(&config)?);
        let catalog = CatalogService::new(AnimeProvider::Jikan)
            .with_provider(jikan)
            .with_provider(anilist)
            .with_settings(settings.clone());

        let (account, watchlist) = if config.account_features_enabled() {
            let identity: Arc<dyn IdentityProvider> = Arc::new(IdentityClient::new(&config)?);
            let store = Arc::new(DocumentStoreClient::new(&config, identity.clone())?);
            let watchlist = Arc::new(WatchlistService::new(store));
            let account = AccountService::new(identity).with_watchlist(watchlist.clone());
            (Some(account), Some(watchlist))
        } else {
            crate::log_info!("Account features disabled: IDENTITY_API_KEY or BACKEND_URL not set");
            (None, None)
        };

        crate::log_debug!(
            "Initialized with settings at {}",
            settings.path().display()
        );

        Ok(Self {
            config,
            settings,
            catalog,
            account,
            watchlist,
        })
    }
}
