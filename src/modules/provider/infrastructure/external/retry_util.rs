use crate::shared::errors::{AppError, AppResult};
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry configuration for external API calls
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl RetryConfig {
    /// Create a conservative retry config for production use.
    ///
    /// The base delay stays above the Jikan cooldown so a retry inside a
    /// queued job never fires sooner than the next queued job could.
    pub fn conservative() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 1.5,
            jitter: true,
        }
    }

    /// Patient retries for a backend that sleeps when idle and needs time to wake up
    pub fn cold_start() -> Self {
        Self {
            max_retries: 4,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(20),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }
}

/// Which failed HTTP attempts may be sent again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOn {
    /// Any transport failure plus 408, 429, 500, 502, 503 and 504.
    /// Only for reads.
    Transient,
    /// Connection failures plus 502, 503 and 504
    Gateway,
    /// Only requests that never reached the server
    ConnectOnly,
}

impl RetryOn {
    fn allows_status(self, status: StatusCode) -> bool {
        match self {
            RetryOn::Transient => RetryUtil::is_retryable_status(status),
            RetryOn::Gateway => matches!(
                status,
                StatusCode::BAD_GATEWAY
                    | StatusCode::SERVICE_UNAVAILABLE
                    | StatusCode::GATEWAY_TIMEOUT
            ),
            RetryOn::ConnectOnly => false,
        }
    }

    fn allows_transport_error(self, error: &reqwest::Error) -> bool {
        match self {
            RetryOn::Transient => true,
            RetryOn::Gateway | RetryOn::ConnectOnly => error.is_connect(),
        }
    }
}

/// One failed HTTP attempt and whether it may be repeated
struct FailedAttempt {
    error: AppError,
    retryable: bool,
}

impl std::fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Retry utility for external API calls with exponential backoff
pub struct RetryUtil;

impl RetryUtil {
    /// Execute a function with retry logic and exponential backoff
    pub async fn with_retry<F, Fut, T>(
        operation: F,
        config: &RetryConfig,
        operation_name: &str,
    ) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = AppResult<T>>,
    {
        Self::with_retry_if(operation, config, operation_name, Self::is_retryable_error).await
    }

    /// Like [`RetryUtil::with_retry`], retrying only errors `retryable` accepts
    async fn with_retry_if<F, Fut, T, E, P>(
        operation: F,
        config: &RetryConfig,
        operation_name: &str,
        retryable: P,
    ) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0;

        loop {
            let error = match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!(
                            "{} succeeded on attempt {} after {} retries",
                            operation_name,
                            attempt + 1,
                            attempt
                        );
                    }
                    return Ok(result);
                }
                Err(error) => error,
            };

            if !retryable(&error) {
                debug!(
                    "{} failed with non-retryable error: {}",
                    operation_name, error
                );
                return Err(error);
            }

            if attempt >= config.max_retries {
                if config.max_retries > 0 {
                    warn!(
                        "{} failed on final attempt {} ({}), giving up",
                        operation_name,
                        attempt + 1,
                        error
                    );
                }
                return Err(error);
            }

            let delay = Self::calculate_delay(attempt, config);
            warn!(
                "{} failed on attempt {} ({}), retrying in {:?}",
                operation_name,
                attempt + 1,
                error,
                delay
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    /// Calculate delay for the given attempt with exponential backoff and jitter
    fn calculate_delay(attempt: u32, config: &RetryConfig) -> Duration {
        let exponential_delay =
            config.base_delay.as_millis() as f64 * config.backoff_multiplier.powi(attempt as i32);

        let mut delay = Duration::from_millis(exponential_delay as u64);

        // Cap at max delay
        if delay > config.max_delay {
            delay = config.max_delay;
        }

        // Add jitter to prevent thundering herd
        if config.jitter {
            let jitter_factor = 0.1; // 10% jitter
            let jitter_ms =
                (delay.as_millis() as f64 * jitter_factor * rand::random::<f64>()) as u64;
            delay = Duration::from_millis(delay.as_millis() as u64 + jitter_ms);
        }

        delay
    }

    /// Determine if an error should trigger a retry
    fn is_retryable_error(error: &AppError) -> bool {
        match error {
            // Network-related errors - usually temporary
            AppError::ExternalServiceError(_) => true,

            // Rate limiting - should retry with backoff
            AppError::RateLimitError(_) => true,

            // Everything else is permanent as far as a retry is concerned
            AppError::ApiError(_)
            | AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::NotFound(_)
            | AppError::Unauthorized(_)
            | AppError::Duplicate(_)
            | AppError::AuthError(_)
            | AppError::InternalError(_)
            | AppError::SerializationError(_)
            | AppError::StorageError(_) => false,
        }
    }

    /// Retry specifically for HTTP requests with status code analysis.
    ///
    /// A response whose status `retry_on` does not cover is returned as is,
    /// so the caller can map it.
    pub async fn retry_http_request<F, Fut>(
        request_fn: F,
        config: &RetryConfig,
        retry_on: RetryOn,
        operation_name: &str,
    ) -> AppResult<reqwest::Response>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        Self::with_retry_if(
            || async {
                match request_fn().await {
                    Ok(response) => {
                        let status = response.status();
                        if retry_on.allows_status(status) {
                            Err(FailedAttempt {
                                error: Self::status_to_app_error(status),
                                retryable: true,
                            })
                        } else {
                            Ok(response)
                        }
                    }
                    Err(e) => Err(FailedAttempt {
                        retryable: retry_on.allows_transport_error(&e),
                        error: AppError::ExternalServiceError(format!(
                            "HTTP request failed: {}",
                            e
                        )),
                    }),
                }
            },
            config,
            operation_name,
            |failed: &FailedAttempt| failed.retryable,
        )
        .await
        .map_err(|failed| failed.error)
    }

    /// Check if HTTP status code indicates a retryable error
    fn is_retryable_status(status: StatusCode) -> bool {
        match status {
            // Server errors - often temporary
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => true,

            // Rate limiting - should retry with backoff
            StatusCode::TOO_MANY_REQUESTS => true,

            // Request timeout - might succeed on retry
            StatusCode::REQUEST_TIMEOUT => true,

            // Client errors and success codes - don't retry
            _ => false,
        }
    }

    /// Convert HTTP status to appropriate AppError
    fn status_to_app_error(status: StatusCode) -> AppError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                AppError::RateLimitError("Rate limit exceeded".to_string())
            }
            _ if status.is_server_error() => {
                AppError::ExternalServiceError(format!("Server error: {}", status))
            }
            _ => AppError::ExternalServiceError(format!("HTTP error: {}", status)),
        }
    }
}

/// Common HTTP response handler for all providers
pub struct CommonHttpHandler;

impl CommonHttpHandler {
    /// Handle HTTP response status codes consistently across all providers
    pub fn handle_response_status(status: StatusCode, provider_name: &str) -> AppResult<()> {
        match status {
            s if s.is_success() => Ok(()),
            StatusCode::TOO_MANY_REQUESTS => Err(AppError::RateLimitError(format!(
                "{} rate limit exceeded",
                provider_name
            ))),
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!(
                "Resource not found on {}",
                provider_name
            ))),
            StatusCode::BAD_REQUEST => Err(AppError::ApiError(format!(
                "Bad request to {} API",
                provider_name
            ))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Unauthorized(
                format!("Access to {} API was refused ({})", provider_name, status),
            )),
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::BAD_GATEWAY
            | StatusCode::GATEWAY_TIMEOUT => Err(AppError::ExternalServiceError(format!(
                "{} service unavailable",
                provider_name
            ))),
            _ => Err(AppError::ApiError(format!(
                "Unexpected status code from {}: {}",
                provider_name, status
            ))),
        }
    }

    /// Create an HTTP client with consistent configuration
    pub fn create_http_client(timeout: Duration, user_agent: &str) -> AppResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to create HTTP client: {}", e))
            })
    }

    /// Execute a read-only HTTP request with retry logic
    pub async fn execute_with_retry<F, Fut>(
        request_fn: F,
        retry_config: &RetryConfig,
        provider_name: &str,
        operation_name: &str,
    ) -> AppResult<reqwest::Response>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        Self::execute_with_retry_on(
            request_fn,
            retry_config,
            RetryOn::Transient,
            provider_name,
            operation_name,
        )
        .await
    }

    /// Execute an HTTP request, retrying only the failures `retry_on` covers
    pub async fn execute_with_retry_on<F, Fut>(
        request_fn: F,
        retry_config: &RetryConfig,
        retry_on: RetryOn,
        provider_name: &str,
        operation_name: &str,
    ) -> AppResult<reqwest::Response>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        RetryUtil::retry_http_request(
            request_fn,
            retry_config,
            retry_on,
            &format!("{} {}", provider_name, operation_name),
        )
        .await
        .and_then(|response| {
            let status = response.status();
            Self::handle_response_status(status, provider_name)?;
            Ok(response)
        })
    }
}
