//! # Data Access Errors
//!
//! Error taxonomy shared by every public operation of the content core.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for content operations
pub type DataResult<T> = Result<T, DataError>;

/// Content core errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// Entity reference resolved to nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Actor is not the owner of the entity it tried to mutate
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A store round trip failed
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl DataError {
    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Forbidden(_) => 403,
            Self::Validation(_) => 400,
            Self::BackendUnavailable(_) => 503,
        }
    }

    /// Whether a caller may retry the same request later
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}

impl From<StoreError> for DataError {
    fn from(err: StoreError) -> Self {
        Self::BackendUnavailable(err.to_string())
    }
}
