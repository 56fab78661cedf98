use serde::{Deserialize, Serialize};

use super::Cart;

/// A finalized sale, recorded at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub lines: Vec<SaleLine>,
    pub total: f64,
    pub status: SaleStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
    Completed,
}

/// Payload for recording a new sale.
#[derive(Debug, Clone)]
pub struct SaleCreate {
    pub lines: Vec<SaleLine>,
    pub total: f64,
}

impl SaleCreate {
    /// Builds the sale payload from a cart snapshot, lines ordered by product id.
    pub fn from_cart(cart: &Cart) -> Self {
        let lines: Vec<SaleLine> = cart
            .sorted_lines()
            .into_iter()
            .map(|line| SaleLine {
                product_id: line.product.id.clone(),
                name: line.product.name.clone(),
                quantity: line.quantity,
                unit_price: line.product.price,
            })
            .collect();
        Self {
            lines,
            total: cart.total(),
        }
    }
}
