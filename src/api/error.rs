//! API error types for the tag client.

use thiserror::Error;

/// Errors that can occur when talking to the tag API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed or no valid session/token was presented.
    #[error("Authentication failed: check your user name and API token")]
    Unauthorized,

    /// Permission denied - account lacks access to the endpoint.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Endpoint not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The request was rejected as malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Throttled by the server, with the wait it asked for in milliseconds.
    #[error("Rate limited: {}", retry_hint(.0))]
    RateLimited(Option<u64>),

    /// Server-side error.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Keyring error when storing/retrieving tokens.
    #[error("Keyring error: {0}")]
    Keyring(String),

    /// The server answered with a body that could not be understood.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

fn retry_hint(timeout: &Option<u64>) -> String {
    match timeout {
        Some(ms) => format!("retry in {} ms", ms),
        None => "please wait before retrying".to_string(),
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            400 => ApiError::BadRequest(context.to_string()),
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(context.to_string()),
            404 => ApiError::NotFound(context.to_string()),
            429 => ApiError::RateLimited(None),
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            _ => ApiError::ServerError(format!("Unexpected HTTP {}: {}", status, context)),
        }
    }
}
