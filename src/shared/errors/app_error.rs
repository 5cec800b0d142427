use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Authentication error: {0}")]
    AuthError(AuthFailure),
}

/// Categorized identity provider failures
#[derive(Error, Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("invalid email or password")]
    InvalidCredential,

    #[error("email address is already in use")]
    EmailAlreadyInUse,

    #[error("password is too weak")]
    WeakPassword,

    #[error("email address is malformed")]
    InvalidEmail,

    #[error("no account exists for this email")]
    UserNotFound,

    #[error("account has been disabled")]
    UserDisabled,

    #[error("too many attempts, try again later")]
    Throttled,

    #[error("network unavailable")]
    NetworkUnavailable,

    #[error("this operation requires a recent login")]
    RequiresRecentLogin,

    #[error("no user is signed in")]
    NotSignedIn,

    #[error("unknown authentication failure")]
    Unknown,
}

impl AuthFailure {
    /// Map an identity provider error code (e.g. `EMAIL_EXISTS`) to a failure category.
    ///
    /// Codes can carry a trailing explanation (`WEAK_PASSWORD : Password should be...`),
    /// only the leading token is considered.
    pub fn from_provider_code(code: &str) -> Self {
        let token = code.split(':').next().unwrap_or_default().trim();
        match token {
            "EMAIL_EXISTS" => AuthFailure::EmailAlreadyInUse,
            "WEAK_PASSWORD" => AuthFailure::WeakPassword,
            "INVALID_EMAIL" | "MISSING_EMAIL" => AuthFailure::InvalidEmail,
            "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => AuthFailure::UserNotFound,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "MISSING_PASSWORD" => {
                AuthFailure::InvalidCredential
            }
            "USER_DISABLED" => AuthFailure::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthFailure::Throttled,
            "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" | "TOKEN_EXPIRED" | "INVALID_ID_TOKEN" => {
                AuthFailure::RequiresRecentLogin
            }
            _ => AuthFailure::Unknown,
        }
    }
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        AppError::AuthError(failure)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::ExternalServiceError("Request timeout".to_string())
        } else if err.is_connect() {
            AppError::ExternalServiceError("Failed to connect to external service".to_string())
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                429 => AppError::RateLimitError("Too many requests".to_string()),
                404 => AppError::NotFound("External resource not found".to_string()),
                401 | 403 => {
                    AppError::Unauthorized("Not authorized to access external service".to_string())
                }
                _ => AppError::ApiError(format!("HTTP {}: {}", status, err)),
            }
        } else {
            AppError::ApiError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
