//! Custom error types for ndtsearch.
//!
//! This module defines all error types used throughout the pipeline.
//! All functions return `Result<T, SearchError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for ndtsearch operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// External API returned an error status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code from API
        code: u16,
        /// Error message from API
        message: String,
    },

    /// Rate limited by external API
    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Export write failure
    #[error("Output error: {0}")]
    Output(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Static configuration error (term catalog, HTTP client setup)
    #[error("Config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Whether a fetch failure abandons only the current term's remaining
    /// pages, letting the run continue with the next term.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SearchError::Network(_) | SearchError::Api { .. } | SearchError::RateLimited(_)
        )
    }
}

/// Result type alias using `SearchError`
pub type Result<T> = std::result::Result<T, SearchError>;
