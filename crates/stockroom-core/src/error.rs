//! Error types for the stockroom core.

use thiserror::Error;

/// Validation errors raised before anything touches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("wrong number of fields: expected {expected}, got {got}")]
    FieldCount { expected: usize, got: usize },

    #[error("quantity must be a non-negative integer, got '{0}'")]
    InvalidQuantity(String),

    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),
}
