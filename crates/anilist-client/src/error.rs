//! Error types for the AniList client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AniListError {
    /// HTTP 429. `reset_at` is the epoch second from `X-RateLimit-Reset` (0 when absent).
    #[error("Rate limited after {retry_after} seconds")]
    RateLimited { reset_at: i64, retry_after: i64 },

    #[error("AniList is unavailable: response was not JSON")]
    ServiceUnavailable,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Jikan fallback failed: {message}")]
    Fallback { message: String },

    #[error("Cache error: {0}")]
    Cache(#[from] std::io::Error),
}

impl AniListError {
    pub(crate) fn fallback(message: impl Into<String>) -> Self {
        Self::Fallback {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AniListError>;
