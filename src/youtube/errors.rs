use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the YouTube Data API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The endpoint answered with a non-success status
    #[error("{endpoint} request failed with status {status}: {message}")]
    Request {
        endpoint: &'static str,
        status: StatusCode,
        message: String,
    },

    /// Transport-level failure (connection, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
