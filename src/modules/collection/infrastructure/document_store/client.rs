use crate::modules::account::traits::IdentityProvider;
use crate::modules::collection::traits::{
    DocumentOperation, DocumentRequest, DocumentResult, DocumentStore,
};
use crate::modules::provider::infrastructure::external::{CommonHttpHandler, RetryConfig, RetryOn};
use crate::shared::config::{AppConfig, USER_AGENT};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{LogContext, TimedOperation};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::dto::{ProxyRequest, ProxyResponse};

/// Client for the document proxy in front of the user's document store.
///
/// Authenticates with the signed-in user's id token and keeps every path
/// inside `users/{uid}/`.
pub struct DocumentStoreClient {
    client: Client,
    endpoint: String,
    identity: Arc<dyn IdentityProvider>,
    retry_config: RetryConfig,
}

impl DocumentStoreClient {
    pub fn new(config: &AppConfig, identity: Arc<dyn IdentityProvider>) -> AppResult<Self> {
        let backend_url = config
            .backend_url
            .as_deref()
            .ok_or_else(|| AppError::InvalidInput("BACKEND_URL is not set".to_string()))?;

        // The proxy sleeps when idle and can take several seconds to wake.
        Self::with_base_url(
            backend_url,
            config.http_timeout,
            identity,
            RetryConfig::cold_start(),
        )
    }

    pub fn with_base_url(
        backend_url: &str,
        http_timeout: Duration,
        identity: Arc<dyn IdentityProvider>,
        retry_config: RetryConfig,
    ) -> AppResult<Self> {
        let client = CommonHttpHandler::create_http_client(http_timeout, USER_AGENT)?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/documents", backend_url.trim_end_matches('/')),
            identity,
            retry_config,
        })
    }

    /// Failures that may be retried without risking a second write.
    ///
    /// Adds create a new document on every request that reaches the proxy,
    /// so they are only repeated when the connection never opened.
    pub fn retry_scope(operation: DocumentOperation) -> RetryOn {
        match operation {
            DocumentOperation::Add => RetryOn::ConnectOnly,
            DocumentOperation::Get | DocumentOperation::Update | DocumentOperation::Delete => {
                RetryOn::Gateway
            }
        }
    }

    /// `watchlist` becomes `users/{uid}/watchlist`
    pub fn scoped_path(uid: &str, collection_path: &str) -> AppResult<String> {
        let relative = collection_path.trim_matches('/');
        if relative.is_empty() || relative.split('/').any(|s| s.is_empty() || s == "..") {
            return Err(AppError::InvalidInput(format!(
                "Invalid collection path '{}'",
                collection_path
            )));
        }
        Ok(format!("users/{}/{}", uid, relative))
    }
}

#[async_trait]
impl DocumentStore for DocumentStoreClient {
    async fn perform_operation(
        &self,
        operation: DocumentOperation,
        collection_path: &str,
        request: DocumentRequest,
    ) -> AppResult<DocumentResult> {
        request.validate_for(operation)?;

        let session = self
            .identity
            .current_session()
            .await
            .ok_or_else(|| AppError::Unauthorized("Sign in to access your watchlist".to_string()))?;
        if session.is_expired() {
            return Err(AppError::Unauthorized(
                "Session expired, sign in again".to_string(),
            ));
        }

        let path = Self::scoped_path(&session.profile.uid, collection_path)?;
        let body = ProxyRequest {
            operation,
            collection_path: &path,
            document_id: request.document_id.as_deref(),
            data: request.data.as_ref(),
            filters: &request.filters,
        };

        let operation_name = operation.to_string();
        LogContext::store_operation(&operation_name, &path, None);
        let timer = TimedOperation::new(&format!("Document {} {}", operation, path));

        let response = CommonHttpHandler::execute_with_retry_on(
            || {
                self.client
                    .post(&self.endpoint)
                    .bearer_auth(&session.id_token)
                    .json(&body)
                    .send()
            },
            &self.retry_config,
            Self::retry_scope(operation),
            "Document store",
            &operation_name,
        )
        .await?;

        let result = match operation {
            DocumentOperation::Get => {
                let parsed: ProxyResponse = response.json().await.map_err(|e| {
                    AppError::SerializationError(format!("Failed to parse documents: {}", e))
                })?;
                DocumentResult::Records(parsed.documents.unwrap_or_default())
            }
            DocumentOperation::Add => {
                let parsed: ProxyResponse = response.json().await.map_err(|e| {
                    AppError::SerializationError(format!("Failed to parse add response: {}", e))
                })?;
                let id = parsed.id.ok_or_else(|| {
                    AppError::SerializationError("Add response carried no document id".to_string())
                })?;
                DocumentResult::DocumentId(id)
            }
            DocumentOperation::Update | DocumentOperation::Delete => DocumentResult::Empty,
        };

        LogContext::store_operation(&operation_name, &path, Some(timer.finish()));
        if let DocumentResult::Records(records) = &result {
            debug!("{} returned {} documents", path, records.len());
        }
        Ok(result)
    }
}
