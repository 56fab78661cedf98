//! Sale finalization: the Sale entity recorded at checkout.

pub mod entity;
pub mod error;

pub use error::*;

use crate::actor_framework::ResourceActor;
use crate::clients::{ProductClient, SaleClient};
use crate::domain::Sale;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new Sale actor and its client, wired to the inventory for stock reservation.
pub fn new(buffer_size: usize, product_client: ProductClient) -> (ResourceActor<Sale>, SaleClient) {
    let sale_id_counter = Arc::new(AtomicU64::new(1));
    let next_sale_id = move || {
        let id = sale_id_counter.fetch_add(1, Ordering::SeqCst);
        format!("sale_{:05}", id)
    };

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_sale_id);
    (actor, SaleClient::new(generic_client, product_client))
}
