//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code. The code is
//! stable per variant so wrapper scripts can branch on it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::DataError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// `init` found a config file already in place
    #[error("{} already exists", path.display())]
    AlreadyInitialized { path: PathBuf },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing the default config failed
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),

    /// Store or auth setup failed
    #[error("failed to boot service: {0}")]
    Boot(#[from] DataError),

    /// Runtime startup, bind or serve failure
    #[error("server error: {0}")]
    Server(#[source] io::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AlreadyInitialized { .. } => 2,
            Self::Config(_) => 3,
            Self::Write { .. } | Self::Encode(_) => 4,
            Self::Boot(_) => 5,
            Self::Server(_) => 6,
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_exit_code() {
        let err = CliError::AlreadyInitialized {
            path: PathBuf::from("./pressroom.json"),
        };
        assert_eq!(err.to_string(), "./pressroom.json already exists");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_boot_failure_wraps_data_error() {
        let err = CliError::from(DataError::validation("service identity missing"));
        assert!(matches!(err, CliError::Boot(_)));
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("service identity missing"));
    }
}
