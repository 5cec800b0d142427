use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Most recent searches kept on device
pub const MAX_RECENT_SEARCHES: usize = 10;
/// Minimum gap between two promo dialogs
pub const PROMO_INTERVAL_DAYS: i64 = 3;
/// How long a dismissed promo stays hidden
pub const PROMO_DISMISS_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" | "auto" => Ok(Theme::System),
            other => Err(AppError::ValidationError(format!(
                "Unknown theme '{}'. Must be one of: light, dark, system",
                other
            ))),
        }
    }
}

/// Everything the app keeps on the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: Theme,
    pub recent_searches: Vec<String>,
    pub search_history_enabled: bool,
    pub promo_last_shown: Option<DateTime<Utc>>,
    pub promo_dismissed_at: Option<DateTime<Utc>>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            recent_searches: Vec::new(),
            search_history_enabled: true,
            promo_last_shown: None,
            promo_dismissed_at: None,
        }
    }
}

impl AppSettings {
    /// Put `query` at the front of the history.
    ///
    /// Returns false when nothing changed (history disabled or blank query).
    pub fn record_search(&mut self, query: &str) -> bool {
        let query = query.trim();
        if !self.search_history_enabled || query.is_empty() {
            return false;
        }

        let lowered = query.to_lowercase();
        self.recent_searches
            .retain(|existing| existing.to_lowercase() != lowered);
        self.recent_searches.insert(0, query.to_string());
        self.recent_searches.truncate(MAX_RECENT_SEARCHES);
        true
    }

    pub fn remove_search(&mut self, query: &str) -> bool {
        let lowered = query.trim().to_lowercase();
        let before = self.recent_searches.len();
        self.recent_searches
            .retain(|existing| existing.to_lowercase() != lowered);
        self.recent_searches.len() != before
    }

    pub fn set_search_history_enabled(&mut self, enabled: bool) {
        self.search_history_enabled = enabled;
        if !enabled {
            self.recent_searches.clear();
        }
    }

    pub fn should_show_promo(&self, now: DateTime<Utc>) -> bool {
        if let Some(dismissed) = self.promo_dismissed_at {
            if now - dismissed < Duration::days(PROMO_DISMISS_DAYS) {
                return false;
            }
        }
        match self.promo_last_shown {
            Some(shown) => now - shown >= Duration::days(PROMO_INTERVAL_DAYS),
            None => true,
        }
    }

    pub fn mark_promo_shown(&mut self, now: DateTime<Utc>) {
        self.promo_last_shown = Some(now);
    }

    pub fn dismiss_promo(&mut self, now: DateTime<Utc>) {
        self.promo_dismissed_at = Some(now);
        self.promo_last_shown = Some(now);
    }
}
