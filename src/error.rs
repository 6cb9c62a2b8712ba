//! Mimir error types

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Mimir error types
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status})")]
    Api { status: u16, detail: String },

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64, detail: String },

    #[error("model overloaded, retry after {retry_after_secs}s")]
    Overloaded { retry_after_secs: u64, detail: String },

    #[error("empty response from model")]
    EmptyResponse,

    #[error("no API key configured for {provider}")]
    MissingCredential { provider: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl MimirError {
    /// True for the failure classes that drive backoff and degraded
    /// responses (HTTP 429/503 upstream).
    pub fn is_throttle(&self) -> bool {
        matches!(
            self,
            MimirError::RateLimited { .. } | MimirError::Overloaded { .. }
        )
    }

    /// Wait hint in whole seconds, present only on throttle errors.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            MimirError::RateLimited { retry_after_secs, .. }
            | MimirError::Overloaded { retry_after_secs, .. } => Some(*retry_after_secs),
            _ => None,
        }
    }

    /// Raw upstream response body, when one was captured and non-empty.
    pub fn detail(&self) -> Option<&str> {
        match self {
            MimirError::Api { detail, .. }
            | MimirError::RateLimited { detail, .. }
            | MimirError::Overloaded { detail, .. } => {
                (!detail.is_empty()).then_some(detail.as_str())
            }
            _ => None,
        }
    }
}

impl IntoResponse for MimirError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            MimirError::RateLimited { retry_after_secs, .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "error": "RATE_LIMIT",
                    "message": "Upstream provider is rate limited. Try again shortly.",
                    "retryAfterSeconds": retry_after_secs,
                    "detail": self.detail(),
                }),
            ),
            MimirError::Overloaded { retry_after_secs, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": "OVERLOADED",
                    "message": "Upstream provider is overloaded. Try again shortly.",
                    "retryAfterSeconds": retry_after_secs,
                    "detail": self.detail(),
                }),
            ),
            MimirError::InvalidInput(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Upstream request failed",
                    "detail": self.to_string(),
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;
