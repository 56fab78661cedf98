use thiserror::Error;

/// Faults the interpreter refuses to paper over. Expected failures (no match,
/// stock ceiling, empty cart) are outcomes, not errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InterpreterError {
    #[error("Malformed cart snapshot at {key}: {reason}")]
    MalformedCart { key: String, reason: String },
    #[error("Duplicate product id in inventory snapshot: {0}")]
    DuplicateProduct(String),
}
