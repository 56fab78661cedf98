use tracing::{error, info, instrument, warn};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::clients::ProductClient;
use crate::domain::{Cart, Sale, SaleCreate};
use crate::product_actor::ProductError;
use crate::sale_actor::SaleError;

/// Client for finalizing and querying sales.
///
/// Checkout is orchestrated on the client side: stock is reserved in the
/// inventory for every cart line before the sale is recorded.
#[derive(Clone)]
pub struct SaleClient {
    inner: ResourceClient<Sale>,
    product_client: ProductClient,
}

impl From<FrameworkError> for SaleError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => SaleError::NotFound(id),
            FrameworkError::Rejected(reason) => SaleError::ValidationError(reason),
            other => SaleError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<ProductError> for SaleError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::InsufficientStock { .. } => SaleError::InsufficientStock(err.to_string()),
            ProductError::NotFound(_) | ProductError::InvalidProduct(_) => SaleError::InvalidProduct(err.to_string()),
            ProductError::ActorCommunicationError(e) => SaleError::ActorCommunicationError(e),
        }
    }
}

impl SaleClient {
    pub fn new(inner: ResourceClient<Sale>, product_client: ProductClient) -> Self {
        Self {
            inner,
            product_client,
        }
    }

    /// Reserves stock for every line of `cart` and records the sale.
    ///
    /// If any reservation fails, the lines already reserved are released
    /// before returning the error.
    #[instrument(skip(self, cart), fields(lines = cart.len(), total = cart.total()))]
    pub async fn create_sale(&self, cart: Cart) -> Result<String, SaleError> {
        info!("Processing create_sale request (Client Side)");

        if cart.is_empty() {
            warn!("Refusing to finalize an empty cart");
            return Err(SaleError::EmptyCart);
        }

        // Step 1: Reserve stock line by line
        let mut reserved: Vec<(String, u32)> = Vec::new();
        for line in cart.sorted_lines() {
            let product_id = line.product.id.clone();
            match self.product_client.reserve_stock(product_id.clone(), line.quantity).await {
                Ok(remaining) => {
                    info!(product_id = %product_id, quantity = line.quantity, remaining, "Stock reserved");
                    reserved.push((product_id, line.quantity));
                }
                Err(e) => {
                    error!(product_id = %product_id, error = %e, "Stock reservation failed");
                    self.release_all(reserved).await;
                    return Err(e.into());
                }
            }
        }

        // Step 2: Record the sale
        match self.inner.create(SaleCreate::from_cart(&cart)).await {
            Ok(sale_id) => {
                info!(sale_id = %sale_id, "Sale recorded");
                Ok(sale_id)
            }
            Err(e) => {
                error!(error = %e, "Recording the sale failed");
                self.release_all(reserved).await;
                Err(e.into())
            }
        }
    }

    async fn release_all(&self, reserved: Vec<(String, u32)>) {
        for (product_id, quantity) in reserved {
            if let Err(e) = self.product_client.release_stock(product_id.clone(), quantity).await {
                error!(product_id = %product_id, error = %e, "Failed to release reserved stock");
            }
        }
    }
}

impl_client_methods!(SaleClient, Sale, SaleError, sale);
