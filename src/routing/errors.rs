//! # Routing Errors
//!
//! Document content never produces an error. These variants cover
//! invocation-contract violations and policy construction only.

use thiserror::Error;

/// Result type for routing operations
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Routing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("Revision body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Invalid resurrection policy: {0}")]
    InvalidPolicy(String),
}

impl RoutingError {
    /// Stable error code for logs and CLI responses
    pub fn code(&self) -> &'static str {
        match self {
            RoutingError::NotAnObject(_) => "SYNCROUTE_NOT_AN_OBJECT",
            RoutingError::InvalidPolicy(_) => "SYNCROUTE_INVALID_POLICY",
        }
    }
}

/// Returns the JSON type name of a value, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
