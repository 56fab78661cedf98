pub mod product;
pub mod cart;
pub mod sale;

pub use product::*;
pub use cart::*;
pub use sale::*;
