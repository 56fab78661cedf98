use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Product;

/// One item's presence in the in-progress sale.
///
/// A line with quantity 0 does not exist; it is removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Snapshot of the shopping cart, keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: HashMap<String, CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(mut self, product: Product, quantity: u32) -> Self {
        self.lines.insert(product.id.clone(), CartLine::new(product, quantity));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Quantity currently in the cart for a product, 0 when absent.
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.lines.get(product_id).map(|line| line.quantity).unwrap_or(0)
    }

    pub fn total(&self) -> f64 {
        self.lines.values().map(CartLine::subtotal).sum()
    }

    /// Lines ordered by product id, so iteration is stable across snapshots.
    pub fn sorted_lines(&self) -> Vec<&CartLine> {
        let mut lines: Vec<&CartLine> = self.lines.values().collect();
        lines.sort_by(|a, b| a.product.id.cmp(&b.product.id));
        lines
    }
}

/// A proposed change to the cart, applied by whoever owns the cart state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CartChange {
    /// Set the line for `product` to exactly `quantity`, creating it if absent.
    Upsert { product: Product, quantity: u32 },
    Delete { product_id: String },
    Clear,
}

impl Cart {
    /// Applies a change in place. Deleting an absent line is a no-op.
    pub fn apply(&mut self, change: &CartChange) {
        match change {
            CartChange::Upsert { product, quantity } => {
                self.lines
                    .insert(product.id.clone(), CartLine::new(product.clone(), *quantity));
            }
            CartChange::Delete { product_id } => {
                self.lines.remove(product_id);
            }
            CartChange::Clear => self.lines.clear(),
        }
    }
}
