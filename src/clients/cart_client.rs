use tokio::sync::mpsc;
use tracing::{debug, instrument};
use crate::cart_actor::{CartError, CartRequest};
use crate::domain::{Cart, CartChange};

/// Client for interacting with the CartService.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|_| CartError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(CartClient => fn snapshot() -> Cart as CartRequest::Snapshot, Error = CartError);
client_method!(CartClient => fn apply(change: CartChange) -> Cart as CartRequest::Apply, Error = CartError);
client_method!(CartClient => fn clear() -> () as CartRequest::Clear, Error = CartError);
