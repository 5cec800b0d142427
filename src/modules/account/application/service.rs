use crate::modules::account::domain::{AuthSession, UserProfile};
use crate::modules::account::traits::IdentityProvider;
use crate::modules::collection::WatchlistService;
use crate::shared::errors::{AppError, AppResult, AuthFailure};
use crate::{log_info, log_warn};
use std::sync::Arc;

/// Account lifecycle on top of an identity provider
pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    watchlist: Option<Arc<WatchlistService>>,
}

impl AccountService {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            watchlist: None,
        }
    }

    /// Watchlist whose documents are removed along with the account
    pub fn with_watchlist(mut self, watchlist: Arc<WatchlistService>) -> Self {
        self.watchlist = Some(watchlist);
        self
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<UserProfile> {
        let session = self.identity.login(email, password).await?;
        Ok(session.profile)
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<UserProfile> {
        let session = self.identity.signup(email, password, display_name).await?;
        log_info!("Welcome, {}", session.profile.name());
        Ok(session.profile)
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.identity.logout().await
    }

    pub async fn reset_password(&self, email: &str) -> AppResult<()> {
        self.identity.reset_password(email).await
    }

    pub async fn update_profile(
        &self,
        display_name: &str,
        photo_url: Option<String>,
    ) -> AppResult<UserProfile> {
        self.identity.update_profile(display_name, photo_url).await
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.identity.current_session().await.map(|s| s.profile)
    }

    pub async fn session(&self) -> AppResult<AuthSession> {
        self.identity
            .current_session()
            .await
            .ok_or(AppError::AuthError(AuthFailure::NotSignedIn))
    }

    /// Delete the user's watchlist, then their identity.
    ///
    /// When the watchlist cannot be cleared the identity is left in place, so
    /// no documents are orphaned under a deleted user.
    pub async fn delete_account(&self) -> AppResult<()> {
        let session = self.session().await?;

        if let Some(watchlist) = &self.watchlist {
            let removed = watchlist.clear().await.map_err(|e| {
                log_warn!(
                    "Account deletion aborted, watchlist could not be cleared: {}",
                    e
                );
                e
            })?;
            log_info!(
                "Removed {} watchlist entries for {}",
                removed,
                session.profile.uid
            );
        }

        self.identity.delete_current_user().await
    }
}
