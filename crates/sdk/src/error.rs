//! Error types for the Haven SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type HavenResult<T> = Result<T, HavenError>;

/// Error types that can occur when using the Haven SDK.
#[derive(Debug, thiserror::Error)]
pub enum HavenError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection timeout.
    #[error("Request timed out")]
    Timeout,

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl HavenError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an error from a non-success status and response body.
    ///
    /// `retry_after_header` is the parsed `Retry-After` header, used for 429
    /// responses whose body does not carry `retry_after`.
    pub fn from_response(status: u16, body: &str, retry_after_header: Option<u64>) -> Self {
        let parsed = serde_json::from_str::<ErrorResponse>(body).ok();

        match status {
            401 | 403 => Self::Authentication(message_of(parsed.as_ref(), body)),
            404 => Self::NotFound(message_of(parsed.as_ref(), body)),
            429 => Self::RateLimited {
                retry_after_secs: parsed
                    .as_ref()
                    .and_then(|e| e.retry_after)
                    .or(retry_after_header),
            },
            _ => match parsed {
                Some(error_response) => Self::Api {
                    status,
                    message: error_response.error,
                    details: error_response.details.or(error_response.message),
                },
                None => Self::Api {
                    status,
                    message: body.to_string(),
                    details: None,
                },
            },
        }
    }
}

fn message_of(parsed: Option<&ErrorResponse>, body: &str) -> String {
    match parsed {
        Some(e) => e.message.clone().unwrap_or_else(|| e.error.clone()),
        None => body.to_string(),
    }
}

/// Error response from the Haven API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}
