//! Account service tests over mocked identity and document store

mod utils;

use anitrack_lib::modules::account::{AccountService, AuthSession, IdentityProvider, UserProfile};
use anitrack_lib::modules::collection::traits::DocumentRecord;
use anitrack_lib::modules::collection::{
    DocumentOperation, DocumentRequest, DocumentResult, DocumentStore, WatchStatus,
    WatchlistService,
};
use anitrack_lib::shared::errors::{AppError, AppResult, AuthFailure};
use async_trait::async_trait;
use mockall::{mock, Sequence};
use std::sync::Arc;
use utils::factories::{AccountFactory, WatchlistFactory};

mock! {
    pub Identity {}

    #[async_trait]
    impl IdentityProvider for Identity {
        async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession>;
        async fn signup(&self, email: &str, password: &str, display_name: &str) -> AppResult<AuthSession>;
        async fn logout(&self) -> AppResult<()>;
        async fn reset_password(&self, email: &str) -> AppResult<()>;
        async fn update_profile(&self, display_name: &str, photo_url: Option<String>) -> AppResult<UserProfile>;
        async fn delete_current_user(&self) -> AppResult<()>;
        async fn current_session(&self) -> Option<AuthSession>;
    }
}

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

fn stored_records() -> DocumentResult {
    let entries = [
        WatchlistFactory::stored("doc-1", 1, WatchStatus::Watching),
        WatchlistFactory::stored("doc-2", 2, WatchStatus::Completed),
    ];
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

fn signed_in_identity() -> MockIdentity {
    let mut identity = MockIdentity::new();
    identity
        .expect_current_session()
        .returning(|| Some(AccountFactory::session("user-1")));
    identity
}

#[tokio::test]
async fn test_login_returns_profile() {
    let mut identity = MockIdentity::new();
    identity
        .expect_login()
        .withf(|email, password| {
            email.to_string() == "user-1@example.com" && password.to_string() == "hunter22"
        })
        .times(1)
        .returning(|_, _| Ok(AccountFactory::session("user-1")));

    let service = AccountService::new(Arc::new(identity));
    let profile = service.login("user-1@example.com", "hunter22").await.unwrap();
    assert_eq!(profile.uid, "user-1");
    assert_eq!(profile.name(), "Tester");
}

#[tokio::test]
async fn test_login_failure_is_categorized() {
    let mut identity = MockIdentity::new();
    identity
        .expect_login()
        .returning(|_, _| Err(AppError::AuthError(AuthFailure::InvalidCredential)));

    let service = AccountService::new(Arc::new(identity));
    let result = service.login("user-1@example.com", "wrong").await;
    assert_eq!(
        result,
        Err(AppError::AuthError(AuthFailure::InvalidCredential))
    );
}

#[tokio::test]
async fn test_session_requires_sign_in() {
    let mut identity = MockIdentity::new();
    identity.expect_current_session().returning(|| None);

    let service = AccountService::new(Arc::new(identity));
    assert_eq!(service.current_user().await, None);
    assert_eq!(
        service.session().await,
        Err(AppError::AuthError(AuthFailure::NotSignedIn))
    );
}

#[tokio::test]
async fn test_delete_clears_watchlist_before_identity() {
    let mut seq = Sequence::new();
    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .withf(|op, _, _| *op == DocumentOperation::Get)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(stored_records()));
    store
        .expect_perform_operation()
        .withf(|op, _, _| *op == DocumentOperation::Delete)
        .times(2)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(DocumentResult::Empty));

    let mut identity = signed_in_identity();
    identity
        .expect_delete_current_user()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));

    let watchlist = Arc::new(WatchlistService::new(Arc::new(store)));
    let service = AccountService::new(Arc::new(identity)).with_watchlist(watchlist);

    // Out-of-order calls panic inside the mocks.
    service.delete_account().await.unwrap();
}

#[tokio::test]
async fn test_delete_aborts_when_watchlist_cannot_be_cleared() {
    let mut store = MockStore::new();
    store
        .expect_perform_operation()
        .returning(|_, _, _| Err(AppError::ExternalServiceError("proxy down".to_string())));

    let mut identity = signed_in_identity();
    identity.expect_delete_current_user().times(0);

    let watchlist = Arc::new(WatchlistService::new(Arc::new(store)));
    let service = AccountService::new(Arc::new(identity)).with_watchlist(watchlist);

    let result = service.delete_account().await;
    assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
}

#[tokio::test]
async fn test_delete_requires_sign_in() {
    let mut identity = MockIdentity::new();
    identity.expect_current_session().returning(|| None);
    identity.expect_delete_current_user().times(0);

    let service = AccountService::new(Arc::new(identity));
    assert_eq!(
        service.delete_account().await,
        Err(AppError::AuthError(AuthFailure::NotSignedIn))
    );
}

#[tokio::test]
async fn test_delete_without_watchlist_only_removes_identity() {
    let mut identity = signed_in_identity();
    identity
        .expect_delete_current_user()
        .times(1)
        .returning(|| Ok(()));

    let service = AccountService::new(Arc::new(identity));
    service.delete_account().await.unwrap();
}
