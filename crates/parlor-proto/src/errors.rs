//! Error types for protocol decoding.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtoError>;

/// Errors that can occur while decoding protocol input.
///
/// Only whole-document failures surface here. Problems inside a single event
/// degrade that event to [`crate::EventKind::Other`] instead.
#[derive(Error, Debug)]
pub enum ProtoError {
    /// Input is not valid JSON
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected a JSON object at the top level
    #[error("expected a json object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead
        found: &'static str,
    },
}

impl ProtoError {
    /// `NotAnObject` naming the JSON type of `value`.
    pub fn not_an_object(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "bool",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Self::NotAnObject { found }
    }
}
