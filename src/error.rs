//! Error types for the fetch cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Configuration Error ==
/// Invalid settings, reported before any I/O happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Retry policy with no attempts at all
    #[error("max_attempts must be greater than zero")]
    ZeroAttempts,

    /// Any other rejected setting
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// == Transport Error ==
/// Failure of a single remote request attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Could not reach the remote host
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request did not complete in time
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The remote answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body was not valid JSON
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Any other request failure
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

// == Cache Error ==
/// Failure reported by a key-value cache store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is empty or too long
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Value could not be converted to or from its stored form
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The backing store itself failed
    #[error("Cache backend error: {0}")]
    Backend(String),
}

// == Fetch Error ==
/// Error surfaced to callers of the cached fetcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Every attempt failed; carries the last transport error
    #[error("resource unavailable after retries: {0}")]
    Unavailable(#[source] TransportError),

    /// Retry parameters were rejected before the first attempt
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

// == Api Error ==
/// Error returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

// == IntoResponse Implementations ==
fn error_response(status: StatusCode, message: String) -> Response {
    let body = Json(json!({
        "error": message
    }));

    (status, body).into_response()
}

impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            CacheError::CacheFull(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Serialization(_) | CacheError::Backend(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        error_response(status, self.to_string())
    }
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        let status = match &self {
            FetchError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            FetchError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error_response(status, self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidRequest(msg) => {
                error_response(StatusCode::BAD_REQUEST, format!("Invalid request: {}", msg))
            }
            ApiError::Fetch(err) => err.into_response(),
            ApiError::Cache(err) => err.into_response(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache store operations.
pub type Result<T> = std::result::Result<T, CacheError>;
