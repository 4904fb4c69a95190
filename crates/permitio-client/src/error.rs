//! Client error types.

use thiserror::Error;

/// Error returned by [`PermitClient`](crate::PermitClient) calls.
#[derive(Debug, Error)]
pub enum PermitError {
    /// The API key was rejected (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The API key lacks permission for the call (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// An object with the same key already exists (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request body was rejected (422).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(
        "rate limited{}",
        .retry_after_secs.map(|s| format!(", retry after {s}s")).unwrap_or_default()
    )]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other non-success status.
    #[error("API error {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<reqwest::Error> for PermitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

impl PermitError {
    /// Whether the same call may succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Stable code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Api { .. } => "API_ERROR",
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::Timeout => "TIMEOUT",
            Self::Http(_) => "HTTP_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::InvalidConfiguration(_) => "INVALID_CONFIG",
        }
    }
}

/// Result type for client calls.
pub type PermitResult<T> = Result<T, PermitError>;
