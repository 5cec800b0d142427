use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::modules::collection::domain::value_objects::WatchStatus;
use crate::modules::collection::traits::DocumentRecord;
use crate::modules::provider::domain::{AnimeProvider, CatalogEntry};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::Validator;

/// One anime on the user's watchlist, stored as a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    /// Document id; `None` until the entry has been stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub anime_id: i64,
    #[serde(default)]
    pub provider: AnimeProvider,
    pub title: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: WatchStatus,
    #[serde(default)]
    pub episodes_watched: u32,
    pub total_episodes: Option<u32>,
    pub score: Option<f32>,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WatchlistEntry {
    pub fn new(anime_id: i64, provider: AnimeProvider, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            anime_id,
            provider,
            title: title.into(),
            image_url: None,
            status: WatchStatus::default(),
            episodes_watched: 0,
            total_episodes: None,
            score: None,
            added_at: now,
            updated_at: now,
        }
    }

    pub fn from_catalog(entry: &CatalogEntry, status: WatchStatus) -> Self {
        let mut watch = Self::new(entry.id, entry.provider, entry.display_title());
        watch.image_url = entry.image_url.clone();
        watch.total_episodes = entry.episodes;
        watch.status = status;
        if status == WatchStatus::Completed {
            if let Some(total) = watch.total_episodes {
                watch.episodes_watched = total;
            }
        }
        watch
    }

    pub fn from_record(record: DocumentRecord) -> AppResult<Self> {
        let mut entry: WatchlistEntry =
            serde_json::from_value(Value::Object(record.data)).map_err(|e| {
                AppError::SerializationError(format!(
                    "Watchlist document {} is malformed: {}",
                    record.id, e
                ))
            })?;
        entry.id = Some(record.id);
        Ok(entry)
    }

    /// Document body, without the id
    pub fn to_document(&self) -> AppResult<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(fields) = value.as_object_mut() {
            fields.remove("id");
        }
        Ok(value)
    }

    pub fn set_status(&mut self, status: WatchStatus) {
        self.status = status;
        if status == WatchStatus::Completed {
            if let Some(total) = self.total_episodes {
                self.episodes_watched = total;
            }
        }
        self.touch();
    }

    /// Record episodes watched. Reaching the known total completes the entry;
    /// starting a planned entry moves it to watching.
    pub fn set_progress(&mut self, episodes: u32) -> AppResult<()> {
        if let Some(total) = self.total_episodes {
            if episodes > total {
                return Err(AppError::ValidationError(format!(
                    "{} has only {} episodes",
                    self.title, total
                )));
            }
            if total > 0 && episodes == total {
                self.status = WatchStatus::Completed;
            }
        }

        if episodes > 0 && self.status == WatchStatus::Planning {
            self.status = WatchStatus::Watching;
        }
        self.episodes_watched = episodes;
        self.touch();
        Ok(())
    }

    pub fn set_score(&mut self, score: Option<f32>) -> AppResult<()> {
        if let Some(score) = score {
            Validator::validate_score(score)?;
        }
        self.score = score;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
