//! Typed async handles for every actor in the store.

#[macro_use]
mod macros;

mod cart_client;
mod product_client;
mod sale_client;
mod voice_client;

pub use cart_client::CartClient;
pub use product_client::ProductClient;
pub use sale_client::SaleClient;
pub use voice_client::VoiceClient;
