use thiserror::Error;
use crate::cart_actor::CartError;
use crate::product_actor::ProductError;
use crate::sale_actor::SaleError;
use crate::voice::InterpreterError;

/// Failures of a voice session request that cannot be turned into a reply.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum VoiceError {
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
    #[error("Inventory error: {0}")]
    Inventory(#[from] ProductError),
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
    #[error("Sale error: {0}")]
    Sale(#[from] SaleError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
