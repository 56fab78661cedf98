use std::path::PathBuf;
use thiserror::Error;
use crate::product_actor::ProductError;
use crate::voice_actor::VoiceError;

/// Store system failures outside a voice request.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Cannot read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot parse catalog {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No product with barcode {0}")]
    UnknownBarcode(String),
    #[error("Inventory error: {0}")]
    Inventory(#[from] ProductError),
    #[error(transparent)]
    Voice(#[from] VoiceError),
    #[error("Cannot read input: {0}")]
    Input(#[from] std::io::Error),
    #[error("Actor task failed: {0}")]
    ActorTask(String),
}
