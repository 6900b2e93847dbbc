//! bedrock-gate error types

use std::time::Duration;

/// Coarse split of failures, so callers can pick a fallback policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Retrying the same request later may succeed.
    Transient,
    /// The request will keep failing until something changes.
    Permanent,
}

/// bedrock-gate error types
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    // Transport/service errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Unknown model id or knowledge base id.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// The service rejected the request body (HTTP 400).
    #[error("request rejected by service: {0}")]
    Validation(String),

    // Response shape errors
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Caller/config errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GateError {
    /// Whether retrying the same request may succeed.
    ///
    /// Timeouts, throttling, dropped connections and 5xx responses are
    /// transient. Bad credentials, unknown resources and rejected
    /// request bodies are not.
    pub fn is_transient(&self) -> bool {
        match self {
            GateError::Http(_) | GateError::RateLimited { .. } | GateError::EmptyResponse => true,
            GateError::Api { status, .. } => {
                matches!(status, 408 | 424 | 429) || (500..600).contains(status)
            }
            _ => false,
        }
    }

    /// Transient/permanent classification of this error.
    pub fn kind(&self) -> ErrorKind {
        if self.is_transient() {
            ErrorKind::Transient
        } else {
            ErrorKind::Permanent
        }
    }

    /// Server-provided backoff hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GateError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GateError::MalformedResponse(err.to_string())
        } else {
            GateError::Http(err.to_string())
        }
    }
}

/// Result type alias for bedrock-gate operations
pub type Result<T> = std::result::Result<T, GateError>;
