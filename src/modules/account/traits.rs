use crate::modules::account::domain::{AuthSession, UserProfile};
use crate::shared::errors::AppResult;
use async_trait::async_trait;

/// Email/password identity capability.
///
/// Failures are reported as `AppError::AuthError` with a categorized
/// `AuthFailure`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    async fn signup(&self, email: &str, password: &str, display_name: &str)
        -> AppResult<AuthSession>;

    /// Forget the local session. Never fails when nobody is signed in.
    async fn logout(&self) -> AppResult<()>;

    async fn reset_password(&self, email: &str) -> AppResult<()>;

    async fn update_profile(
        &self,
        display_name: &str,
        photo_url: Option<String>,
    ) -> AppResult<UserProfile>;

    /// Delete the signed-in user's identity and end the session
    async fn delete_current_user(&self) -> AppResult<()>;

    async fn current_session(&self) -> Option<AuthSession>;
}
