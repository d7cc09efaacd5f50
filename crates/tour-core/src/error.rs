#![forbid(unsafe_code)]

//! Construction-time configuration errors.

use thiserror::Error;

/// A tour was configured incorrectly.
///
/// Raised synchronously when a session or config is built and never
/// recovered automatically; the call site has to be fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The step list is empty, so there is nothing to open.
    #[error("tour has no steps")]
    EmptyTour,
    /// A required callback was not supplied.
    #[error("missing required callback `{0}`")]
    MissingCallback(&'static str),
    /// A step's position does not match its index in the list.
    #[error("step at index {index} declares position {position}")]
    PositionMismatch { index: usize, position: usize },
    /// Two steps target the same element id.
    #[error("duplicate step id `{0}`")]
    DuplicateId(String),
    /// A step has a blank element id.
    #[error("step at index {index} has an empty id")]
    EmptyId { index: usize },
    /// A class name is blank or holds more than one token.
    #[error("class name `{field}` must be a single non-empty token, got {value:?}")]
    InvalidClassName { field: &'static str, value: String },
    /// The JSON configuration could not be parsed.
    #[error("invalid tour json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
