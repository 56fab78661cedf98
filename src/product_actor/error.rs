use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Insufficient stock for {product_id}: {reason}")]
    InsufficientStock { product_id: String, reason: String },
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
