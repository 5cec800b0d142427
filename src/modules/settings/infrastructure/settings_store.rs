use crate::modules::settings::domain::{AppSettings, Theme};
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_warn};
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// JSON-file backed settings.
///
/// Every mutation is written through before the call returns. Writers hold
/// the lock while the file is written, so saves never interleave.
pub struct SettingsStore {
    path: PathBuf,
    state: RwLock<AppSettings>,
}

impl SettingsStore {
    /// Load settings from `path`. A missing file or one that fails to parse
    /// yields defaults; other read failures are returned.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let settings = Self::load(&path).await?;

        Ok(Self {
            path,
            state: RwLock::new(settings),
        })
    }

    async fn load(path: &Path) -> AppResult<AppSettings> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log_debug!("No settings file at {}, using defaults", path.display());
                return Ok(AppSettings::default());
            }
            Err(e) => {
                return Err(AppError::StorageError(format!(
                    "Failed to read settings from {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        match serde_json::from_str::<AppSettings>(&raw) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log_warn!(
                    "Settings file {} is corrupt ({}), falling back to defaults",
                    path.display(),
                    e
                );
                Ok(AppSettings::default())
            }
        }
    }

    async fn save(&self, settings: &AppSettings) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Apply `change` and persist when it reports a modification
    async fn update<F, R>(&self, change: F) -> AppResult<R>
    where
        F: FnOnce(&mut AppSettings) -> (R, bool),
    {
        let mut guard = self.state.write().await;
        let mut next = guard.clone();
        let (result, changed) = change(&mut next);
        if changed {
            self.save(&next).await?;
            *guard = next;
        }
        Ok(result)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> AppSettings {
        self.state.read().await.clone()
    }

    pub async fn theme(&self) -> Theme {
        self.state.read().await.theme
    }

    pub async fn set_theme(&self, theme: Theme) -> AppResult<()> {
        self.update(|s| {
            let changed = s.theme != theme;
            s.theme = theme;
            ((), changed)
        })
        .await
    }

    pub async fn recent_searches(&self) -> Vec<String> {
        self.state.read().await.recent_searches.clone()
    }

    pub async fn search_history_enabled(&self) -> bool {
        self.state.read().await.search_history_enabled
    }

    pub async fn record_search(&self, query: &str) -> AppResult<()> {
        self.update(|s| ((), s.record_search(query))).await
    }

    pub async fn remove_search(&self, query: &str) -> AppResult<bool> {
        self.update(|s| {
            let removed = s.remove_search(query);
            (removed, removed)
        })
        .await
    }

    pub async fn clear_search_history(&self) -> AppResult<()> {
        self.update(|s| {
            let changed = !s.recent_searches.is_empty();
            s.recent_searches.clear();
            ((), changed)
        })
        .await
    }

    pub async fn set_search_history_enabled(&self, enabled: bool) -> AppResult<()> {
        self.update(|s| {
            let changed = s.search_history_enabled != enabled || !s.recent_searches.is_empty();
            s.set_search_history_enabled(enabled);
            ((), changed)
        })
        .await
    }

    pub async fn should_show_promo(&self, now: DateTime<Utc>) -> bool {
        self.state.read().await.should_show_promo(now)
    }

    pub async fn mark_promo_shown(&self, now: DateTime<Utc>) -> AppResult<()> {
        self.update(|s| {
            s.mark_promo_shown(now);
            ((), true)
        })
        .await
    }

    pub async fn dismiss_promo(&self, now: DateTime<Utc>) -> AppResult<()> {
        self.update(|s| {
            s.dismiss_promo(now);
            ((), true)
        })
        .await
    }
}
