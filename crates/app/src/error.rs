//! Error types for the application layer

use homecook_api_client::ApiError;
use homecook_core::validation::ValidationResult;
use thiserror::Error;

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    /// A backend or image host call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A form failed client-side validation
    #[error("Validation failed: {}", summarize(.0))]
    Validation(ValidationResult),

    /// Reading or writing persisted state failed
    #[error("Storage error: {0}")]
    Storage(#[from] homecook_core::Error),

    /// The operation needs a logged-in user
    #[error("Not logged in")]
    NotAuthenticated,

    /// The backend would not sign an image upload
    #[error("Could not obtain an upload signature: {0}")]
    SignatureUnavailable(#[source] ApiError),

    /// A dropped file batch was refused before upload
    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    /// An action was attempted while the view does not allow it
    #[error("{0}")]
    NotReady(&'static str),
}

impl AppError {
    /// Field errors, when this is a validation failure
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            Self::Validation(result) => Some(result),
            _ => None,
        }
    }

    /// Whether the backend rejected the session
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }
}

impl From<ValidationResult> for AppError {
    fn from(result: ValidationResult) -> Self {
        Self::Validation(result)
    }
}

fn summarize(result: &ValidationResult) -> String {
    result
        .errors()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
