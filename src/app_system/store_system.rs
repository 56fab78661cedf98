use std::path::Path;
use tracing::{error, info};
use crate::cart_actor::CartService;
use crate::clients::{CartClient, ProductClient, SaleClient, VoiceClient};
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::voice_actor::VoiceService;
use crate::{product_actor, sale_actor};
use super::{Config, SystemError};

/// The store: inventory, cart, sales and the voice session wired together.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct StoreSystem {
    pub voice_client: VoiceClient,
    pub product_client: ProductClient,
    pub cart_client: CartClient,
    pub sale_client: SaleClient,
    handles: Vec<(&'static str, tokio::task::JoinHandle<()>)>,
}

impl StoreSystem {
    pub fn new(buffer_size: usize) -> Self {
        // 1. Inventory
        let (product_actor, product_client) = product_actor::new(buffer_size);
        let product_handle = tokio::spawn(product_actor.run());

        // 2. Cart
        let (cart_service, cart_client) = CartService::new(buffer_size);
        let cart_handle = tokio::spawn(cart_service.run());

        // 3. Sales, reserving stock through the inventory
        let (sale_actor, sale_client) = sale_actor::new(buffer_size, product_client.clone());
        let sale_handle = tokio::spawn(sale_actor.run());

        // 4. Voice session on top of everything else
        let (voice_service, voice_client) = VoiceService::new(
            buffer_size,
            product_client.clone(),
            cart_client.clone(),
            sale_client.clone(),
        );
        let voice_handle = tokio::spawn(voice_service.run());

        Self {
            voice_client,
            product_client,
            cart_client,
            sale_client,
            // Shutdown order: dependents first
            handles: vec![
                ("voice", voice_handle),
                ("cart", cart_handle),
                ("sales", sale_handle),
                ("inventory", product_handle),
            ],
        }
    }

    /// Starts the system and loads the configured (or built-in) catalog.
    pub async fn start(config: &Config) -> Result<Self, SystemError> {
        let catalog = match &config.catalog {
            Some(path) => load_catalog(path)?,
            None => default_catalog(),
        };
        let system = Self::new(config.buffer_size);
        system.seed(catalog).await?;
        Ok(system)
    }

    pub async fn seed(&self, catalog: Vec<ProductCreate>) -> Result<Vec<String>, SystemError> {
        let mut ids = Vec::with_capacity(catalog.len());
        for product in catalog {
            ids.push(self.product_client.create_product(product).await?);
        }
        info!(products = ids.len(), "Catalog loaded");
        Ok(ids)
    }

    /// Records a physical stock count for the product carrying `barcode`.
    ///
    /// Lines already in the cart keep their quantity; the next change to them
    /// is checked against the counted stock.
    pub async fn count_stock(&self, barcode: &str, counted: u32) -> Result<Product, SystemError> {
        let product = self
            .product_client
            .find_by_barcode(barcode.to_string())
            .await?
            .ok_or_else(|| SystemError::UnknownBarcode(barcode.trim().to_string()))?;

        let previous = self.product_client.check_stock(product.id.clone()).await?;
        let patch = ProductPatch {
            quantity: Some(counted),
            ..ProductPatch::default()
        };
        let updated = self.product_client.update_product(product.id, patch).await?;
        info!(product_id = %updated.id, previous, counted, "Stock counted");
        Ok(updated)
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        // The hand-written services stop on request; resource actors stop once
        // every client is dropped.
        if let Err(e) = self.voice_client.shutdown().await {
            error!(error = %e, "Voice service already stopped");
        }
        if let Err(e) = self.cart_client.shutdown().await {
            error!(error = %e, "Cart service already stopped");
        }
        drop(self.voice_client);
        drop(self.cart_client);
        drop(self.sale_client);
        drop(self.product_client);

        for (name, handle) in self.handles {
            if let Err(e) = handle.await {
                error!(actor = name, "Actor task failed: {:?}", e);
                return Err(SystemError::ActorTask(format!("{}: {}", name, e)));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

/// Reads a JSON array of products.
pub fn load_catalog(path: &Path) -> Result<Vec<ProductCreate>, SystemError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SystemError::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SystemError::CatalogParse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn default_catalog() -> Vec<ProductCreate> {
    vec![
        ProductCreate::new("Manzana Roja", 0.5, 40).with_category("Frutas").with_barcode("7790000000011"),
        ProductCreate::new("Leche Entera", 1.2, 12).with_category("Lácteos").with_barcode("7790000000028"),
        ProductCreate::new("Pan Integral", 2.0, 8).with_category("Panadería"),
        ProductCreate::new("Lápiz HB", 0.3, 100).with_category("Librería").with_barcode("7790000000035"),
        ProductCreate::new("Cuaderno Rayado", 1.8, 25).with_category("Librería"),
        ProductCreate::new("Chocolate Amargo", 3.0, 6).with_category("Golosinas"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use crate::voice::NoopReason;

    #[tokio::test]
    async fn test_system_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
        let system = StoreSystem::new(8);
        let ids = system.seed(default_catalog()).await?;
        assert_eq!(ids.first().map(String::as_str), Some("product_00001"));

        let reply = system.voice_client.submit_transcript("agregar 2 lapices".into()).await?;
        assert_eq!(reply.message, "Se agregaron 2 Lápiz HB al carrito.");

        let reply = system.voice_client.scan_barcode("7790000000028".into()).await?;
        assert_eq!(reply.message, "Se agregó 1 Leche Entera al carrito.");

        let reply = system.voice_client.submit_transcript("cobrar".into()).await?;
        assert!(reply.sale_id.is_some());
        assert_eq!(system.product_client.check_stock(ids[3].clone()).await?, 98);

        system.shutdown().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_stock_count_applies_to_later_changes() -> Result<(), Box<dyn std::error::Error>> {
        let system = StoreSystem::new(8);
        system.seed(default_catalog()).await?;

        system.voice_client.submit_transcript("agregar 3 leches".into()).await?;

        // Shelf count finds only two bottles
        let leche = system.count_stock(" 7790000000028 ", 2).await?;
        assert_eq!(leche.quantity, 2);
        assert_eq!(system.product_client.check_stock(leche.id.clone()).await?, 2);

        let reply = system.voice_client.submit_transcript("cambiar leche a 3".into()).await?;
        assert_eq!(reply.outcome.noop_reason(), Some(&NoopReason::InsufficientStock { available: 2 }));
        assert!(reply.message.contains("Solo hay 2 unidades"));

        let reply = system.voice_client.submit_transcript("cambiar leche a 2".into()).await?;
        assert_eq!(reply.message, "Se actualizó Leche Entera a 2 unidades.");

        let missing = system.count_stock("0000", 5).await.unwrap_err();
        assert!(matches!(missing, SystemError::UnknownBarcode(ref code) if code == "0000"));

        system.shutdown().await?;
        Ok(())
    }

    #[test]
    fn test_load_catalog() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join(format!("voice_cart_catalog_{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path)?;
        write!(
            file,
            r#"[{{"name":"Yerba Mate","price":4.5,"quantity":10,"barcode":"123"}},{{"name":"Azúcar","price":1.1,"quantity":5}}]"#
        )?;

        let catalog = load_catalog(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].barcode.as_deref(), Some("123"));
        assert_eq!(catalog[1].category, "");

        let missing = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(missing, SystemError::CatalogIo { .. }));
        Ok(())
    }
}
