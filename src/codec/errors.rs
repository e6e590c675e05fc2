//! # Codec Errors

use thiserror::Error;

use crate::errors::DataError;

/// Result type for decoding
pub type CodecResult<T> = Result<T, CodecError>;

/// Raw record could not be turned into an entity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Body is not a JSON object
    #[error("{kind} {key}: document is not an object")]
    NotAnObject { kind: &'static str, key: String },

    /// A field has an unusable type
    #[error("{kind} {key}: {reason}")]
    Malformed {
        kind: &'static str,
        key: String,
        reason: String,
    },
}

impl From<CodecError> for DataError {
    fn from(err: CodecError) -> Self {
        DataError::BackendUnavailable(format!("corrupt record: {}", err))
    }
}
