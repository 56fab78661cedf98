//! The voice session: the root actor that turns transcripts and barcode scans
//! into cart changes.
//!
//! Requests are served strictly one at a time, so every interpretation sees
//! the cart as left by the previous one.

pub mod error;

pub use error::*;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, instrument, warn};
use crate::clients::{CartClient, ProductClient, SaleClient, VoiceClient};
use crate::domain::Cart;
use crate::sale_actor::SaleError;
use crate::voice::{self, NoopReason, Outcome};

pub type VoiceResponse<T> = oneshot::Sender<Result<T, VoiceError>>;

#[derive(Debug)]
pub enum VoiceRequest {
    Transcript {
        text: String,
        respond_to: VoiceResponse<VoiceReply>,
    },
    Barcode {
        code: String,
        respond_to: VoiceResponse<VoiceReply>,
    },
    Shutdown,
}

/// What the shopper hears back after a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceReply {
    pub outcome: Outcome,
    pub message: String,
    /// Set only when a checkout recorded a sale.
    pub sale_id: Option<String>,
}

impl VoiceReply {
    fn from_outcome(outcome: Outcome) -> Self {
        let message = outcome.message().unwrap_or_default().to_string();
        Self {
            outcome,
            message,
            sale_id: None,
        }
    }
}

pub struct VoiceService {
    receiver: mpsc::Receiver<VoiceRequest>,
    product_client: ProductClient,
    cart_client: CartClient,
    sale_client: SaleClient,
}

impl VoiceService {
    pub fn new(
        buffer_size: usize,
        product_client: ProductClient,
        cart_client: CartClient,
        sale_client: SaleClient,
    ) -> (Self, VoiceClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            product_client,
            cart_client,
            sale_client,
        };
        (service, VoiceClient::new(sender))
    }

    #[instrument(name = "voice_service", skip(self))]
    pub async fn run(mut self) {
        info!("VoiceService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                VoiceRequest::Transcript { text, respond_to } => {
                    let _ = respond_to.send(self.handle_transcript(text).await);
                }
                VoiceRequest::Barcode { code, respond_to } => {
                    let _ = respond_to.send(self.handle_barcode(code).await);
                }
                VoiceRequest::Shutdown => {
                    info!("VoiceService shutting down");
                    break;
                }
            }
        }
        info!("VoiceService stopped");
    }

    #[instrument(skip(self))]
    async fn handle_transcript(&self, text: String) -> Result<VoiceReply, VoiceError> {
        let inventory = self.product_client.list_products().await?;
        let cart = self.cart_client.snapshot().await?;

        match voice::interpret(&text, &inventory, &cart)? {
            Outcome::Checkout => self.checkout(cart).await,
            outcome => self.apply(outcome).await,
        }
    }

    #[instrument(skip(self))]
    async fn handle_barcode(&self, code: String) -> Result<VoiceReply, VoiceError> {
        let Some(product) = self.product_client.find_by_barcode(code.clone()).await? else {
            warn!("Unknown barcode");
            let outcome = Outcome::Noop {
                reason: NoopReason::NotFound { suggestion: None },
                message: format!("No se encontró el código {} en el inventario.", code.trim()),
            };
            return Ok(VoiceReply::from_outcome(outcome));
        };

        let cart = self.cart_client.snapshot().await?;
        self.apply(voice::propose_add(&product, 1, &cart)).await
    }

    async fn apply(&self, outcome: Outcome) -> Result<VoiceReply, VoiceError> {
        if let Some(change) = outcome.change() {
            let cart = self.cart_client.apply(change.clone()).await?;
            info!(lines = cart.len(), total = cart.total(), "Cart changed");
        }
        Ok(VoiceReply::from_outcome(outcome))
    }

    async fn checkout(&self, cart: Cart) -> Result<VoiceReply, VoiceError> {
        let total = cart.total();
        match self.sale_client.create_sale(cart).await {
            Ok(sale_id) => {
                self.cart_client.clear().await?;
                info!(sale_id = %sale_id, total, "Checkout complete");
                Ok(VoiceReply {
                    outcome: Outcome::Checkout,
                    message: format!("Compra finalizada. Venta {} por un total de ${:.2}.", sale_id, total),
                    sale_id: Some(sale_id),
                })
            }
            Err(SaleError::EmptyCart) => Ok(VoiceReply {
                outcome: Outcome::Checkout,
                message: "El carrito está vacío, no hay nada que cobrar.".to_string(),
                sale_id: None,
            }),
            Err(e @ (SaleError::InsufficientStock(_) | SaleError::InvalidProduct(_))) => {
                warn!(error = %e, "Checkout rejected");
                Ok(VoiceReply {
                    outcome: Outcome::Checkout,
                    message: format!("No se pudo finalizar la compra: {}", e),
                    sale_id: None,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart_actor::CartService;
    use crate::domain::{CartChange, ProductCreate};
    use crate::{product_actor, sale_actor};

    struct Session {
        voice: VoiceClient,
        products: ProductClient,
        cart: CartClient,
        sales: SaleClient,
    }

    async fn session() -> Session {
        let (product_actor, products) = product_actor::new(10);
        tokio::spawn(product_actor.run());
        let (cart_service, cart) = CartService::new(10);
        tokio::spawn(cart_service.run());
        let (sale_actor, sales) = sale_actor::new(10, products.clone());
        tokio::spawn(sale_actor.run());
        let (voice_service, voice) = VoiceService::new(10, products.clone(), cart.clone(), sales.clone());
        tokio::spawn(voice_service.run());

        let catalog = [
            ProductCreate::new("Manzana Roja", 0.5, 10).with_barcode("7790001"),
            ProductCreate::new("Leche Entera", 1.2, 3),
        ];
        for product in catalog {
            products.create_product(product).await.unwrap();
        }
        Session { voice, products, cart, sales }
    }

    #[tokio::test]
    async fn test_transcript_applies_change() {
        let s = session().await;

        let reply = s.voice.submit_transcript("agregar dos manzanas".into()).await.unwrap();
        assert_eq!(reply.message, "Se agregaron 2 Manzana Roja al carrito.");
        assert_eq!(s.cart.snapshot().await.unwrap().quantity_of("product_00001"), 2);

        let reply = s.voice.submit_transcript("agregar cinco leches".into()).await.unwrap();
        assert_eq!(reply.outcome.noop_reason(), Some(&NoopReason::InsufficientStock { available: 3 }));
        assert_eq!(s.cart.snapshot().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_records_sale_and_reserves_stock() {
        let s = session().await;
        s.voice.submit_transcript("agregar 3 leches".into()).await.unwrap();

        let reply = s.voice.submit_transcript("finalizar compra".into()).await.unwrap();
        assert_eq!(reply.outcome, Outcome::Checkout);
        let sale_id = reply.sale_id.expect("sale recorded");

        let sale = s.sales.get_sale(sale_id).await.unwrap().unwrap();
        assert_eq!(sale.lines.len(), 1);
        assert_eq!(sale.lines[0].quantity, 3);
        assert!((sale.total - 3.6).abs() < 1e-9);

        assert_eq!(s.products.check_stock("product_00002".into()).await.unwrap(), 0);
        assert!(s.cart.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_is_a_reply() {
        let s = session().await;
        let reply = s.voice.submit_transcript("pagar".into()).await.unwrap();
        assert_eq!(reply.sale_id, None);
        assert!(reply.message.contains("vacío"));
        assert!(s.sales.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_rejected_when_stock_moved() {
        let s = session().await;
        s.voice.submit_transcript("agregar 2 leches".into()).await.unwrap();
        s.voice.submit_transcript("agregar 4 manzanas".into()).await.unwrap();

        // Another till sold most of the milk meanwhile
        s.products.reserve_stock("product_00002".into(), 2).await.unwrap();

        let reply = s.voice.submit_transcript("finalizar compra".into()).await.unwrap();
        assert_eq!(reply.sale_id, None);
        assert!(reply.message.starts_with("No se pudo finalizar la compra"));

        // The apples reserved before the failure were put back
        assert_eq!(s.products.check_stock("product_00001".into()).await.unwrap(), 10);
        assert_eq!(s.cart.snapshot().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_checkout_of_withdrawn_product_keeps_cart() {
        let s = session().await;
        s.voice.submit_transcript("agregar 2 manzanas".into()).await.unwrap();

        s.products.delete_product("product_00001".into()).await.unwrap();
        assert_eq!(s.products.get_product("product_00001".into()).await.unwrap(), None);

        let reply = s.voice.submit_transcript("finalizar compra".into()).await.unwrap();
        assert_eq!(reply.sale_id, None);
        assert!(reply.message.contains("product_00001"));
        assert_eq!(s.cart.snapshot().await.unwrap().quantity_of("product_00001"), 2);

        // Once the line goes, the rest can be sold and the record voided
        s.voice.submit_transcript("quitar manzanas".into()).await.unwrap();
        s.voice.submit_transcript("agregar leche".into()).await.unwrap();
        let sale_id = s.voice.submit_transcript("pagar".into()).await.unwrap().sale_id.expect("sale recorded");
        s.sales.delete_sale(sale_id.clone()).await.unwrap();
        assert_eq!(s.sales.get_sale(sale_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_barcode_scan() {
        let s = session().await;

        let reply = s.voice.scan_barcode(" 7790001 ".into()).await.unwrap();
        assert_eq!(reply.message, "Se agregó 1 Manzana Roja al carrito.");
        let reply = s.voice.scan_barcode("7790001".into()).await.unwrap();
        assert!(matches!(reply.outcome.change(), Some(CartChange::Upsert { quantity: 2, .. })));

        let reply = s.voice.scan_barcode("0000".into()).await.unwrap();
        assert_eq!(reply.outcome.noop_reason(), Some(&NoopReason::NotFound { suggestion: None }));
        assert_eq!(s.cart.snapshot().await.unwrap().quantity_of("product_00001"), 2);
    }

    #[tokio::test]
    async fn test_shutdown_closes_client() {
        let s = session().await;
        s.voice.shutdown().await.unwrap();
        let err = s.voice.submit_transcript("vaciar carrito".into()).await.unwrap_err();
        assert!(matches!(err, VoiceError::ActorCommunicationError(_)));
    }
}
