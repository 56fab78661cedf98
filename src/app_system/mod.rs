//! System orchestration, startup, and shutdown logic.

pub mod config;
pub mod error;
pub mod store_system;
pub mod tracing;

pub use self::config::*;
pub use self::error::*;
pub use self::store_system::*;
pub use self::tracing::*;
