//! The shopping-session actor: owns the in-progress cart and applies the
//! changes proposed by the voice interpreter or the barcode scanner.

pub mod error;

pub use error::*;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};
use crate::clients::CartClient;
use crate::domain::{Cart, CartChange};

pub type CartResponse<T> = oneshot::Sender<Result<T, CartError>>;

#[derive(Debug)]
pub enum CartRequest {
    Snapshot {
        respond_to: CartResponse<Cart>,
    },
    Apply {
        change: CartChange,
        respond_to: CartResponse<Cart>,
    },
    Clear {
        respond_to: CartResponse<()>,
    },
    Shutdown,
}

pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    cart: Cart,
}

impl CartService {
    pub fn new(buffer_size: usize) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            cart: Cart::new(),
        };
        (service, CartClient::new(sender))
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!("CartService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.cart.clone()));
                }
                CartRequest::Apply { change, respond_to } => {
                    let _ = respond_to.send(self.handle_apply(change));
                }
                CartRequest::Clear { respond_to } => {
                    debug!(lines = self.cart.len(), "Clearing cart");
                    self.cart.apply(&CartChange::Clear);
                    let _ = respond_to.send(Ok(()));
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }
        info!("CartService stopped");
    }

    /// Applies a change after re-checking the line invariants; a rejected
    /// change leaves the cart untouched.
    #[instrument(skip(self))]
    fn handle_apply(&mut self, change: CartChange) -> Result<Cart, CartError> {
        if let CartChange::Upsert { product, quantity } = &change {
            if *quantity == 0 {
                warn!("Rejecting zero-quantity line");
                return Err(CartError::InvalidQuantity {
                    product_id: product.id.clone(),
                    quantity: *quantity,
                });
            }
            if *quantity > product.quantity {
                warn!(available = product.quantity, "Rejecting line above stock");
                return Err(CartError::InsufficientStock {
                    product_id: product.id.clone(),
                    requested: *quantity,
                    available: product.quantity,
                });
            }
        }
        self.cart.apply(&change);
        debug!(lines = self.cart.len(), "Cart updated");
        Ok(self.cart.clone())
    }
}
