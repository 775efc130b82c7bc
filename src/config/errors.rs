//! # Configuration Errors

use std::path::PathBuf;

use thiserror::Error;

use crate::routing::RoutingError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<RoutingError> for ConfigError {
    fn from(e: RoutingError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}
