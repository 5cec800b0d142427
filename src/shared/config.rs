//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Only the base URLs have defaults pointing at the public services; the
//! identity key and backend URL are required for account features only.

use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::rate_limiter::JIKAN_COOLDOWN_MS;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";
pub const DEFAULT_ANILIST_BASE_URL: &str = "https://graphql.anilist.co";
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = "anitrack/0.1 (+https://github.com/anitrack/anitrack)";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub jikan_base_url: String,
    pub jikan_cooldown: Duration,
    pub anilist_base_url: String,
    pub identity_base_url: String,
    pub identity_api_key: Option<String>,
    pub backend_url: Option<String>,
    pub http_timeout: Duration,
    pub settings_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jikan_base_url: DEFAULT_JIKAN_BASE_URL.to_string(),
            jikan_cooldown: Duration::from_millis(JIKAN_COOLDOWN_MS),
            anilist_base_url: DEFAULT_ANILIST_BASE_URL.to_string(),
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            identity_api_key: None,
            backend_url: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            settings_path: Self::default_settings_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env` (if present) and the environment
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jikan_cooldown = match non_empty("JIKAN_COOLDOWN_MS") {
            Some(raw) => Duration::from_millis(raw.trim().parse::<u64>().map_err(|e| {
                AppError::InvalidInput(format!("JIKAN_COOLDOWN_MS must be an integer: {}", e))
            })?),
            None => defaults.jikan_cooldown,
        };

        let http_timeout = match non_empty("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    AppError::InvalidInput(format!("HTTP_TIMEOUT_SECS must be an integer: {}", e))
                })?;
                if secs == 0 {
                    // Queued Jikan jobs rely on this timeout to settle.
                    return Err(AppError::ValidationError(
                        "HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.http_timeout,
        };

        Ok(Self {
            jikan_base_url: non_empty("JIKAN_BASE_URL")
                .map(|url| trim_url(&url))
                .unwrap_or(defaults.jikan_base_url),
            jikan_cooldown,
            anilist_base_url: non_empty("ANILIST_BASE_URL")
                .map(|url| trim_url(&url))
                .unwrap_or(defaults.anilist_base_url),
            identity_base_url: non_empty("IDENTITY_BASE_URL")
                .map(|url| trim_url(&url))
                .unwrap_or(defaults.identity_base_url),
            identity_api_key: non_empty("IDENTITY_API_KEY"),
            backend_url: non_empty("BACKEND_URL").map(|url| trim_url(&url)),
            http_timeout,
            settings_path: non_empty("SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.settings_path),
        })
    }

    fn default_settings_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("anitrack")
            .join("settings.json")
    }

    /// Account features need both the identity key and the backend proxy
    pub fn account_features_enabled(&self) -> bool {
        self.identity_api_key.is_some() && self.backend_url.is_some()
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
