use tracing::{debug, instrument, warn};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the inventory (Product actor).
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl From<FrameworkError> for ProductError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            FrameworkError::Rejected(reason) => ProductError::InvalidProduct(reason),
            other => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl ProductClient {
    #[instrument(skip(self), fields(name = %product.name))]
    pub async fn create_product(&self, product: ProductCreate) -> Result<String, ProductError> {
        debug!("Sending request");
        self.inner.create(product).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(ProductError::from)
    }

    /// Looks a scanned code up in the inventory; `None` when no product carries it.
    #[instrument(skip(self))]
    pub async fn find_by_barcode(&self, barcode: String) -> Result<Option<Product>, ProductError> {
        debug!("Sending request");
        let code = barcode.trim();
        let products = self.list_products().await?;
        Ok(products
            .into_iter()
            .find(|p| p.barcode.as_deref().map(str::trim) == Some(code)))
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::StockLevel(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id.clone(), ProductAction::ReserveStock(quantity)).await {
            Ok(ProductActionResult::Reserved { remaining }) => Ok(remaining),
            Ok(other) => Err(unexpected(other)),
            Err(FrameworkError::Rejected(reason)) => Err(ProductError::InsufficientStock { product_id: id, reason }),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReleaseStock(quantity)).await? {
            ProductActionResult::Released { remaining } => Ok(remaining),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    warn!(?result, "Unexpected action result");
    ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}
