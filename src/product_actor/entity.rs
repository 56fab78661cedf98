use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};
use super::actions::{ProductAction, ProductActionResult};

impl Entity for Product {
    type Id = String;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    fn id(&self) -> &String { &self.id }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Rejects an empty name or a negative / non-finite price.
    fn from_create(id: String, payload: ProductCreate) -> Result<Self, String> {
        let name = payload.name.trim();
        if name.is_empty() {
            return Err("Product name must not be empty".to_string());
        }
        validate_price(payload.price)?;
        Ok(Self {
            id,
            name: name.to_string(),
            price: payload.price,
            quantity: payload.quantity,
            category: payload.category,
            barcode: payload.barcode.filter(|code| !code.trim().is_empty()),
        })
    }

    /// Updates price, stock, category and/or barcode.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(price) = patch.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(barcode) = patch.barcode {
            self.barcode = Some(barcode);
        }
        Ok(())
    }

    /// Handles stock actions.
    ///
    /// # Errors
    /// Returns an error if attempting to reserve more stock than available.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::StockLevel(self.quantity)),
            ProductAction::ReserveStock(amount) => {
                if self.quantity >= amount {
                    self.quantity -= amount;
                    Ok(ProductActionResult::Reserved { remaining: self.quantity })
                } else {
                    Err(format!("{} available, {} requested", self.quantity, amount))
                }
            }
            ProductAction::ReleaseStock(amount) => {
                self.quantity = self.quantity.saturating_add(amount);
                Ok(ProductActionResult::Released { remaining: self.quantity })
            }
        }
    }
}

fn validate_price(price: f64) -> Result<(), String> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(format!("Invalid price: {}", price))
    }
}
