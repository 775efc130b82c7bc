//! CLI-specific error types
//!
//! Every CLI error terminates the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::routing::RoutingError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Input could not be read as a revision
    InvalidInput,
    /// `--now` is not an RFC 3339 timestamp
    InvalidTimestamp,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SYNCROUTE_CLI_CONFIG_ERROR",
            Self::IoError => "SYNCROUTE_CLI_IO_ERROR",
            Self::InvalidInput => "SYNCROUTE_CLI_INVALID_INPUT",
            Self::InvalidTimestamp => "SYNCROUTE_CLI_INVALID_TIMESTAMP",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    pub fn invalid_timestamp(value: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            CliErrorCode::InvalidTimestamp,
            format!("'{}' is not an RFC 3339 timestamp: {}", value, reason),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_input(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<RoutingError> for CliError {
    fn from(e: RoutingError) -> Self {
        Self::invalid_input(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
