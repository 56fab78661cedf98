use std::path::PathBuf;
use clap::Parser;

/// Runtime configuration for the voice cart demo.
#[derive(Debug, Clone, Parser)]
#[command(name = "voice_cart")]
#[command(about = "Voice-driven shopping cart for a small shop till", long_about = None)]
pub struct Config {
    /// Mailbox capacity of every actor
    #[arg(long, env = "VOICE_CART_BUFFER", default_value_t = 32)]
    pub buffer_size: usize,

    /// JSON file with the product catalog; a built-in catalog is used when absent
    #[arg(long, env = "VOICE_CART_CATALOG", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Tracing filter used when RUST_LOG is unset
    #[arg(long, env = "VOICE_CART_LOG", default_value = "info")]
    pub log_filter: String,

    /// Transcripts to process in order; `#<code>` is a barcode scan. Read from stdin when empty.
    pub transcripts: Vec<String>,
}
