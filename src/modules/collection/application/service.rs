use super::super::domain::{WatchStatus, WatchlistEntry};
use super::super::traits::{DocumentOperation, DocumentRequest, DocumentStore, Filter};
use crate::modules::provider::domain::AnimeProvider;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_info};
use std::sync::Arc;

/// Collection path of the watchlist inside the user's namespace
pub const WATCHLIST_COLLECTION: &str = "watchlist";

pub struct WatchlistService {
    store: Arc<dyn DocumentStore>,
}

impl WatchlistService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Entries, optionally only those with `status`, most recently updated first
    pub async fn list(&self, status: Option<WatchStatus>) -> AppResult<Vec<WatchlistEntry>> {
        let mut request = DocumentRequest::new();
        if let Some(status) = status {
            request = request.with_filter(Filter::eq("status", status.as_str()));
        }

        let mut entries = self.fetch(request).await?;
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries)
    }

    pub async fn find_by_anime(
        &self,
        anime_id: i64,
        provider: AnimeProvider,
    ) -> AppResult<Option<WatchlistEntry>> {
        let request = DocumentRequest::new()
            .with_filter(Filter::eq("animeId", anime_id))
            .with_filter(Filter::eq("provider", provider.to_string()));

        Ok(self.fetch(request).await?.into_iter().next())
    }

    pub async fn get(&self, id: &str) -> AppResult<WatchlistEntry> {
        self.fetch(DocumentRequest::new().with_id(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Watchlist entry {} not found", id)))
    }

    /// Store a new entry. An anime can be on the watchlist once per provider.
    pub async fn add(&self, entry: WatchlistEntry) -> AppResult<WatchlistEntry> {
        if entry.anime_id <= 0 {
            return Err(AppError::ValidationError(
                "Anime ID must be positive".to_string(),
            ));
        }
        if let Some(existing) = self.find_by_anime(entry.anime_id, entry.provider).await? {
            return Err(AppError::Duplicate(format!(
                "{} is already on your watchlist as {}",
                existing.title, existing.status
            )));
        }

        log_debug!("Adding {} ({}) to watchlist", entry.title, entry.anime_id);
        let id = self
            .store
            .perform_operation(
                DocumentOperation::Add,
                WATCHLIST_COLLECTION,
                DocumentRequest::new().with_data(entry.to_document()?),
            )
            .await?
            .into_document_id()?;

        let mut stored = entry;
        stored.id = Some(id);
        log_info!("Added {} to watchlist", stored.title);
        Ok(stored)
    }

    pub async fn update_status(&self, id: &str, status: WatchStatus) -> AppResult<WatchlistEntry> {
        let mut entry = self.get(id).await?;
        entry.set_status(status);
        self.save(entry).await
    }

    pub async fn update_progress(&self, id: &str, episodes: u32) -> AppResult<WatchlistEntry> {
        let mut entry = self.get(id).await?;
        entry.set_progress(episodes)?;
        self.save(entry).await
    }

    pub async fn set_score(&self, id: &str, score: Option<f32>) -> AppResult<WatchlistEntry> {
        let mut entry = self.get(id).await?;
        entry.set_score(score)?;
        self.save(entry).await
    }

    pub async fn remove(&self, id: &str) -> AppResult<()> {
        self.store
            .perform_operation(
                DocumentOperation::Delete,
                WATCHLIST_COLLECTION,
                DocumentRequest::new().with_id(id),
            )
            .await?;
        log_debug!("Removed watchlist entry {}", id);
        Ok(())
    }

    /// Remove every entry, returning how many were removed
    pub async fn clear(&self) -> AppResult<usize> {
        let entries = self.fetch(DocumentRequest::new()).await?;
        let mut removed = 0;
        for id in entries.iter().filter_map(|e| e.id.as_deref()) {
            self.remove(id).await?;
            removed += 1;
        }
        Ok(removed)
    }

    async fn fetch(&self, request: DocumentRequest) -> AppResult<Vec<WatchlistEntry>> {
        self.store
            .perform_operation(DocumentOperation::Get, WATCHLIST_COLLECTION, request)
            .await?
            .into_records()?
            .into_iter()
            .map(WatchlistEntry::from_record)
            .collect()
    }

    async fn save(&self, entry: WatchlistEntry) -> AppResult<WatchlistEntry> {
        let id = entry
            .id
            .clone()
            .ok_or_else(|| AppError::InternalError("Cannot update an unsaved entry".to_string()))?;

        self.store
            .perform_operation(
                DocumentOperation::Update,
                WATCHLIST_COLLECTION,
                DocumentRequest::new()
                    .with_id(id)
                    .with_data(entry.to_document()?),
            )
            .await?;
        Ok(entry)
    }
}
