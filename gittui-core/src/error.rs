//! Error types for gittui-core

use thiserror::Error;

/// Main error type for the gittui-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failure (connect, timeout, body decode)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status returned by the REST API
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Errors reported inside a GraphQL response body
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Missing or rejected credentials
    #[error("authentication error: {0}")]
    Auth(String),
}

impl Error {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for gittui-core
pub type Result<T> = std::result::Result<T, Error>;
