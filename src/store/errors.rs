//! # Store Errors
//!
//! Errors raised by document store round trips.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// In-process state lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Persistence I/O failed
    #[error("Store I/O error: {0}")]
    Io(String),

    /// A document or snapshot could not be (de)serialized
    #[error("Store serialization error: {0}")]
    Serialization(String),

    /// Document body is not a JSON object
    #[error("Document must be a JSON object")]
    NotAnObject,
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
