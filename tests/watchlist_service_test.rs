//! Watchlist service tests over a mocked document store

mod utils;

use anitrack_lib::modules::collection::traits::DocumentRecord;
use anitrack_lib::modules::collection::{
    DocumentOperation, DocumentRequest, DocumentResult, DocumentStore, Filter, WatchStatus,
    WatchlistEntry, WatchlistService,
};
use anitrack_lib::modules::provider::AnimeProvider;
use anitrack_lib::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use mockall::mock;
use serde_json::json;
use std::sync::Arc;
use utils::factories::WatchlistFactory;

mock! {
    pub Store {}

    #[async_trait]
    impl DocumentStore for Store {
        async fn perform_operation(
            &self,
            operation: DocumentOperation,
            collection_path: &str,
            request: DocumentRequest,
        ) -> AppResult<DocumentResult>;
    }
}

fn records(entries: &[WatchlistEntry]) -> DocumentResult {
    DocumentResult::Records(
        entries
            .iter()
            .map(|entry| {
                let id = entry.id.clone().unwrap_or_default();
                serde_json::from_value::<DocumentRecord>(WatchlistFactory::document(&id, entry))
                    .unwrap()
            })
            .collect(),
    )
}

fn service(store: MockStore) -> WatchlistService {
    WatchlistService::new(Arc::new(store))
}

#[tokio::test]
async fn test_add_stores_entry_and_returns_id() {
    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .withf(|op, path, request| {
            *op == DocumentOperation::Get
                && path.to_string() == "watchlist"
                && request.filters
                    == vec![Filter::eq("animeId", 5114), Filter::eq("provider", "jikan")]
        })
        .times(1)
        .returning(|_, _, _| Ok(DocumentResult::Records(vec![])));
    store
        .expect_perform_operation()
        .withf(|op, path, request| {
            *op == DocumentOperation::Add
                && path.to_string() == "watchlist"
                && request.data.as_ref().map_or(false, |data| {
                    data.get("id").is_none()
                        && data["animeId"] == json!(5114)
                        && data["status"] == json!("planning")
                })
        })
        .times(1)
        .returning(|_, _, _| Ok(DocumentResult::DocumentId("doc-1".to_string())));

    let stored = service(store)
        .add(WatchlistFactory::entry(5114, "Fullmetal Alchemist: Brotherhood"))
        .await
        .unwrap();

    assert_eq!(stored.id.as_deref(), Some("doc-1"));
    assert_eq!(stored.status, WatchStatus::Planning);
}

#[tokio::test]
async fn test_add_rejects_duplicate() {
    let existing = WatchlistFactory::stored("doc-1", 5114, WatchStatus::Watching);

    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .withf(|op, _, _| *op == DocumentOperation::Get)
        .times(1)
        .returning(move |_, _, _| Ok(records(&[existing.clone()])));

    let result = service(store)
        .add(WatchlistFactory::entry(5114, "Fullmetal Alchemist: Brotherhood"))
        .await;

    match result {
        Err(AppError::Duplicate(message)) => assert!(message.contains("Watching")),
        other => panic!("expected a duplicate error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_same_anime_from_another_provider_is_not_a_duplicate() {
    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .withf(|op, _, request| {
            *op == DocumentOperation::Get
                && request.filters.contains(&Filter::eq("provider", "anilist"))
        })
        .times(1)
        .returning(|_, _, _| Ok(DocumentResult::Records(vec![])));
    store
        .expect_perform_operation()
        .withf(|op, _, _| *op == DocumentOperation::Add)
        .times(1)
        .returning(|_, _, _| Ok(DocumentResult::DocumentId("doc-2".to_string())));

    let entry = WatchlistEntry::new(5114, AnimeProvider::AniList, "Hagane no Renkinjutsushi");
    let stored = service(store).add(entry).await.unwrap();
    assert_eq!(stored.id.as_deref(), Some("doc-2"));
}

#[tokio::test]
async fn test_add_rejects_invalid_anime_id_without_store_calls() {
    let store = MockStore::new();
    let result = service(store)
        .add(WatchlistEntry::new(0, AnimeProvider::Jikan, "Nothing"))
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_progress_to_last_episode_completes_entry() {
    let entry = WatchlistFactory::stored("doc-1", 9253, WatchStatus::Watching);

    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .withf(|op, _, request| {
            *op == DocumentOperation::Get && request.document_id.as_deref() == Some("doc-1")
        })
        .times(1)
        .returning(move |_, _, _| Ok(records(&[entry.clone()])));
    store
        .expect_perform_operation()
        .withf(|op, _, request| {
            *op == DocumentOperation::Update
                && request.document_id.as_deref() == Some("doc-1")
                && request.data.as_ref().map_or(false, |data| {
                    data["status"] == json!("completed") && data["episodesWatched"] == json!(12)
                })
        })
        .times(1)
        .returning(|_, _, _| Ok(DocumentResult::Empty));

    let updated = service(store).update_progress("doc-1", 12).await.unwrap();
    assert_eq!(updated.status, WatchStatus::Completed);
    assert_eq!(updated.episodes_watched, 12);
}

#[tokio::test]
async fn test_progress_beyond_total_is_rejected() {
    let entry = WatchlistFactory::stored("doc-1", 9253, WatchStatus::Watching);

    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .withf(|op, _, _| *op == DocumentOperation::Get)
        .times(1)
        .returning(move |_, _, _| Ok(records(&[entry.clone()])));

    let result = service(store).update_progress("doc-1", 13).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_score_is_validated_before_saving() {
    let entry = WatchlistFactory::stored("doc-1", 9253, WatchStatus::Completed);

    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .withf(|op, _, _| *op == DocumentOperation::Get)
        .times(2)
        .returning(move |_, _, _| Ok(records(&[entry.clone()])));
    store
        .expect_perform_operation()
        .withf(|op, _, request| {
            *op == DocumentOperation::Update
                && request
                    .data
                    .as_ref()
                    .map_or(false, |data| data["score"] == json!(9.0))
        })
        .times(1)
        .returning(|_, _, _| Ok(DocumentResult::Empty));

    let service = service(store);
    assert!(matches!(
        service.set_score("doc-1", Some(11.0)).await,
        Err(AppError::ValidationError(_))
    ));
    let updated = service.set_score("doc-1", Some(9.0)).await.unwrap();
    assert_eq!(updated.score, Some(9.0));
}

#[tokio::test]
async fn test_list_filters_by_status_and_sorts_newest_first() {
    let mut older = WatchlistFactory::stored("doc-1", 1, WatchStatus::Watching);
    older.updated_at = Utc::now() - Duration::days(2);
    let mut newer = WatchlistFactory::stored("doc-2", 2, WatchStatus::Watching);
    newer.updated_at = Utc::now();

    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .withf(|op, _, request| {
            *op == DocumentOperation::Get
                && request.filters == vec![Filter::eq("status", "watching")]
        })
        .times(1)
        .returning(move |_, _, _| Ok(records(&[older.clone(), newer.clone()])));

    let entries = service(store)
        .list(Some(WatchStatus::Watching))
        .await
        .unwrap();

    let ids: Vec<_> = entries.iter().map(|e| e.id.as_deref().unwrap()).collect();
    assert_eq!(ids, vec!["doc-2", "doc-1"]);
}

#[tokio::test]
async fn test_get_missing_entry_is_not_found() {
    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .returning(|_, _, _| Ok(DocumentResult::Records(vec![])));

    let result = service(store).get("missing").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_clear_removes_every_entry() {
    let entries = vec![
        WatchlistFactory::stored("doc-1", 1, WatchStatus::Planning),
        WatchlistFactory::stored("doc-2", 2, WatchStatus::Dropped),
        WatchlistFactory::stored("doc-3", 3, WatchStatus::Completed),
    ];

    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .withf(|op, _, request| *op == DocumentOperation::Get && request.filters.is_empty())
        .times(1)
        .returning(move |_, _, _| Ok(records(&entries)));
    store
        .expect_perform_operation()
        .withf(|op, _, request| {
            *op == DocumentOperation::Delete && request.document_id.is_some()
        })
        .times(3)
        .returning(|_, _, _| Ok(DocumentResult::Empty));

    assert_eq!(service(store).clear().await.unwrap(), 3);
}

#[tokio::test]
async fn test_store_errors_propagate() {
    let mut store = MockStore::new();
    store.expect_perform_operation().returning(|_, _, _| {
        Err(AppError::Unauthorized(
            "Sign in to access your watchlist".to_string(),
        ))
    });

    let result = service(store).list(None).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}
