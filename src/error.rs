//! Error types for hn-best-stories
//!
//! This module provides error handling for the library, including:
//! - The domain error type shared by the source, aggregator and API layers
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for hn-best-stories operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hn-best-stories
///
/// The aggregation pipeline only ever surfaces [`Error::InvalidLimit`] and
/// [`Error::Cancelled`] to its callers. The upstream variants are produced by
/// the HTTP source internally and absorbed there.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "upstream.base_url")
        key: Option<String>,
    },

    /// Requested story count is outside the accepted range
    #[error("limit must be between 1 and {max}, got {limit}")]
    InvalidLimit {
        /// The rejected limit
        limit: i64,
        /// The inclusive upper bound
        max: usize,
    },

    /// The caller cancelled the operation or its deadline elapsed
    #[error("operation cancelled")]
    Cancelled,

    /// Transport error talking to the upstream item API
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-success HTTP status
    #[error("upstream returned HTTP {status} for {url}")]
    UpstreamStatus {
        /// The HTTP status code returned
        status: u16,
        /// The requested URL
        url: String,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is a cancellation rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "invalid_limit",
///     "message": "limit must be between 1 and 100, got 0",
///     "details": { "limit": 0, "min": 1, "max": 100 }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "invalid_limit", "upstream_unavailable")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    /// Create a "rate limited" error
    pub fn rate_limited(retry_after_seconds: u64) -> Self {
        Self::with_details(
            "rate_limited",
            "Too many requests",
            serde_json::json!({ "retry_after_seconds": retry_after_seconds }),
        )
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - invalid input
            Error::InvalidLimit { .. } => 400,

            // 502 Bad Gateway - upstream failures
            Error::Network(_) => 502,
            Error::UpstreamStatus { .. } => 502,
            Error::Serialization(_) => 502,

            // 504 Gateway Timeout - deadline elapsed or caller went away
            Error::Cancelled => 504,

            // 500 Internal Server Error
            Error::Config { .. } => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::InvalidLimit { .. } => "invalid_limit",
            Error::Cancelled => "cancelled",
            Error::Network(_) => "upstream_unavailable",
            Error::UpstreamStatus { .. } => "upstream_unavailable",
            Error::Serialization(_) => "upstream_malformed",
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::InvalidLimit { limit, max } => Some(serde_json::json!({
                "limit": limit,
                "min": 1,
                "max": max,
            })),
            Error::UpstreamStatus { status, .. } => Some(serde_json::json!({
                "upstream_status": status,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
