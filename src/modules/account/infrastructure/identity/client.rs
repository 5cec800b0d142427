use crate::modules::account::domain::{AuthSession, UserProfile};
use crate::modules::account::traits::IdentityProvider;
use crate::modules::provider::infrastructure::external::CommonHttpHandler;
use crate::shared::config::{AppConfig, USER_AGENT};
use crate::shared::errors::{AppError, AppResult, AuthFailure};
use crate::shared::utils::{LogContext, TimedOperation, Validator};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::dto::{
    AuthResponse, ErrorResponse, IdTokenRequest, OobCodeRequest, PasswordAuthRequest,
    UpdateProfileRequest, UpdateProfileResponse,
};

/// Default token lifetime when the provider omits or garbles `expiresIn`
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Identity Toolkit REST client.
///
/// Holds the signed-in session in memory; nothing is written to disk.
pub struct IdentityClient {
    client: Client,
    base_url: String,
    api_key: String,
    session: RwLock<Option<AuthSession>>,
}

impl IdentityClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let api_key = config.identity_api_key.as_deref().ok_or_else(|| {
            AppError::InvalidInput("IDENTITY_API_KEY is not set".to_string())
        })?;
        Self::with_base_url(&config.identity_base_url, api_key, config.http_timeout)
    }

    pub fn with_base_url(base_url: &str, api_key: &str, http_timeout: Duration) -> AppResult<Self> {
        let client = CommonHttpHandler::create_http_client(http_timeout, USER_AGENT)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            session: RwLock::new(None),
        })
    }

    async fn signed_in(&self) -> AppResult<AuthSession> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(AppError::AuthError(AuthFailure::NotSignedIn))
    }

    /// POST `body` to `accounts:{method}` and decode the reply
    async fn call<B, R>(&self, method: &str, body: &B) -> AppResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/accounts:{}", self.base_url, method);
        let timer = TimedOperation::new(&format!("Identity {}", method));

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Identity request {} failed to send: {}", method, e);
                AppError::AuthError(AuthFailure::NetworkUnavailable)
            })?;

        let status = response.status();
        LogContext::api_call("Identity", method, status.as_str(), Some(timer.finish()));

        if status.is_success() {
            let parsed = response.json::<R>().await.map_err(|e| {
                AppError::SerializationError(format!("Failed to parse identity response: {}", e))
            })?;
            return Ok(parsed);
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => {
                let failure = AuthFailure::from_provider_code(&error.error.message);
                debug!(
                    "Identity {} rejected ({}): {} -> {:?}",
                    method, status, error.error.message, failure
                );
                Err(AppError::AuthError(failure))
            }
            Err(_) if status.is_server_error() => {
                Err(AppError::AuthError(AuthFailure::NetworkUnavailable))
            }
            Err(_) => Err(AppError::ExternalServiceError(format!(
                "Identity {} returned {}",
                method, status
            ))),
        }
    }

    fn session_from(response: AuthResponse, fallback_email: &str) -> AuthSession {
        let expires_in = response
            .expires_in
            .parse::<i64>()
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);

        AuthSession::new(
            UserProfile {
                uid: response.local_id,
                email: response.email.unwrap_or_else(|| fallback_email.to_string()),
                display_name: response.display_name.filter(|n| !n.is_empty()),
                photo_url: None,
            },
            response.id_token,
            response.refresh_token,
            expires_in,
        )
    }

    async fn set_session(&self, session: Option<AuthSession>) {
        *self.session.write().await = session;
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        Validator::validate_email(email)?;
        if password.is_empty() {
            return Err(AppError::AuthError(AuthFailure::InvalidCredential));
        }

        let response: AuthResponse = self
            .call(
                "signInWithPassword",
                &PasswordAuthRequest {
                    email: email.trim(),
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        let session = Self::session_from(response, email.trim());
        info!("Signed in as {}", session.profile.uid);
        self.set_session(Some(session.clone())).await;
        Ok(session)
    }

    async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<AuthSession> {
        Validator::validate_email(email)?;
        Validator::validate_password(password)?;
        Validator::validate_display_name(display_name)?;

        let response: AuthResponse = self
            .call(
                "signUp",
                &PasswordAuthRequest {
                    email: email.trim(),
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        let mut session = Self::session_from(response, email.trim());
        self.set_session(Some(session.clone())).await;

        // The account exists from here on; a failed name update leaves it unnamed.
        match self.update_profile(display_name, None).await {
            Ok(profile) => session.profile = profile,
            Err(e) => warn!("Account created but display name was not saved: {}", e),
        }

        info!("Created account {}", session.profile.uid);
        Ok(self.session.read().await.clone().unwrap_or(session))
    }

    async fn logout(&self) -> AppResult<()> {
        if self.session.write().await.take().is_some() {
            info!("Signed out");
        }
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> AppResult<()> {
        Validator::validate_email(email)?;

        let _: serde_json::Value = self
            .call(
                "sendOobCode",
                &OobCodeRequest {
                    request_type: "PASSWORD_RESET",
                    email: email.trim(),
                },
            )
            .await?;
        Ok(())
    }

    async fn update_profile(
        &self,
        display_name: &str,
        photo_url: Option<String>,
    ) -> AppResult<UserProfile> {
        Validator::validate_display_name(display_name)?;
        let current = self.signed_in().await?;

        let response: UpdateProfileResponse = self
            .call(
                "update",
                &UpdateProfileRequest {
                    id_token: &current.id_token,
                    display_name: display_name.trim(),
                    photo_url: photo_url.as_deref(),
                    return_secure_token: true,
                },
            )
            .await?;

        let profile = UserProfile {
            uid: response.local_id,
            email: response.email.unwrap_or(current.profile.email.clone()),
            display_name: response.display_name,
            photo_url: response.photo_url.or(current.profile.photo_url.clone()),
        };

        let mut updated = current;
        updated.profile = profile.clone();
        if let (Some(id_token), Some(refresh_token)) = (response.id_token, response.refresh_token) {
            let expires_in = response
                .expires_in
                .and_then(|e| e.parse::<i64>().ok())
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
            updated = AuthSession::new(profile.clone(), id_token, refresh_token, expires_in);
        }
        self.set_session(Some(updated)).await;

        Ok(profile)
    }

    async fn delete_current_user(&self) -> AppResult<()> {
        let current = self.signed_in().await?;

        let _: serde_json::Value = self
            .call(
                "delete",
                &IdTokenRequest {
                    id_token: &current.id_token,
                },
            )
            .await?;

        info!("Deleted account {}", current.profile.uid);
        self.set_session(None).await;
        Ok(())
    }

    async fn current_session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }
}
