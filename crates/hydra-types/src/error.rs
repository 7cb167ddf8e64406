//! Error types for data parsing and goal validation in hydra-types.

use thiserror::Error;

use crate::types::IntakeKind;

/// Errors that can occur when decoding a persisted value.
///
/// These never escape the store's read paths: a value that fails to parse is
/// treated as absent (or, during a sweep, as garbage).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The value is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The value is valid JSON but not an object.
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Result type alias using hydra-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors raised when goal settings fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GoalError {
    /// A goal must be a positive integer.
    #[error("{kind} goal must be positive, got {value}")]
    NotPositive {
        /// Which goal was rejected.
        kind: IntakeKind,
        /// The rejected value.
        value: u32,
    },
}
