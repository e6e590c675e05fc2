//! # Service Configuration
//!
//! JSON configuration file. Every field has a default, so a missing file
//! yields a usable in-memory service; a malformed file is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the service establishes its store identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Sign in as a fresh anonymous identity
    #[default]
    Anonymous,
    /// Use the fixed `service_identity`
    Service,
    /// Never sign in; reads run unauthenticated
    None,
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8787)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// JSON snapshot file backing the store; absent keeps data in memory
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default)]
    pub auth_mode: AuthMode,

    /// Identity used when `auth_mode` is `service`
    #[serde(default)]
    pub service_identity: Option<String>,

    #[serde(default = "default_max_comment_length")]
    pub max_comment_length: usize,

    #[serde(default = "default_max_report_reason_length")]
    pub max_report_reason_length: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_max_comment_length() -> usize {
    5000
}

fn default_max_report_reason_length() -> usize {
    1000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            data_file: None,
            auth_mode: AuthMode::default(),
            service_identity: None,
            max_comment_length: default_max_comment_length(),
            max_report_reason_length: default_max_report_reason_length(),
        }
    }
}

impl ServiceConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Create a config listening on `port`
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth_mode == AuthMode::Service
            && self
                .service_identity
                .as_deref()
                .map_or(true, |id| id.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "auth_mode \"service\" requires service_identity".to_string(),
            ));
        }
        if self.max_comment_length == 0 || self.max_report_reason_length == 0 {
            return Err(ConfigError::Invalid("length limits must be positive".to_string()));
        }
        Ok(())
    }

    /// Socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
