//! Error types for the API client

use std::fmt;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// The backend rejected the session cookie
    #[error("Not authorized - the session is missing or has expired")]
    Unauthorized,

    /// Request timeout
    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The image host refused an upload
    #[error("Image upload failed ({status}): {message}")]
    Upload {
        /// HTTP status code
        status: u16,
        /// Error message from the image host
        message: String,
    },
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Create an image upload error
    pub fn upload(status: u16, message: impl Into<String>) -> Self {
        Self::Upload {
            status,
            message: message.into(),
        }
    }

    /// HTTP status behind this error, if the server answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } | Self::Upload { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Json(_) | Self::Config(_) | Self::Timeout(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Check if this is the session-expired case
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s >= 500)
    }
}

/// Error context for better debugging
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Request ID for correlation
    pub request_id: Option<String>,
    /// Endpoint that was called
    pub endpoint: String,
    /// HTTP method used
    pub method: String,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.endpoint)?;
        if let Some(ref id) = self.request_id {
            write!(f, " (request_id: {id})")?;
        }
        Ok(())
    }
}
