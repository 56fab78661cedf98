mod actor_framework;
#[macro_use]
mod clients;
mod domain;

mod app_system;

mod cart_actor;
mod product_actor;
mod sale_actor;
mod voice;
mod voice_actor;

#[cfg(test)]
mod mock_framework;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, Instrument};
use crate::app_system::{setup_tracing, Config, StoreSystem, SystemError};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let config = Config::parse();

    // Setup tracing once for the entire application
    setup_tracing(&config.log_filter);

    info!(buffer_size = config.buffer_size, catalog = ?config.catalog, "Starting voice cart");

    // Starts every service and loads the catalog
    let system = StoreSystem::start(&config).await?;

    if config.transcripts.is_empty() {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            handle_input(&system, line.trim()).await;
        }
    } else {
        for input in &config.transcripts {
            handle_input(&system, input.trim()).await;
        }
    }

    let cart = system.cart_client.snapshot().await.map_err(crate::voice_actor::VoiceError::from)?;
    info!(lines = cart.len(), total = cart.total(), "Session finished");

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

/// Sends one line to the voice session; `#<code>` is a barcode scan and
/// `=<code> <count>` records a shelf count.
async fn handle_input(system: &StoreSystem, input: &str) {
    if input.is_empty() {
        return;
    }
    if let Some(count) = input.strip_prefix('=') {
        handle_stock_count(system, count).await;
        return;
    }

    let voice_client = &system.voice_client;

    let span = tracing::info_span!("voice_input", input);
    let reply = async {
        match input.strip_prefix('#') {
            Some(code) => voice_client.scan_barcode(code.to_string()).await,
            None => voice_client.submit_transcript(input.to_string()).await,
        }
    }
    .instrument(span)
    .await;

    match reply {
        Ok(reply) => {
            println!("> {}", input);
            println!("{}", reply.message);
            match serde_json::to_string(&reply.outcome) {
                Ok(json) => info!(outcome = %json, sale_id = ?reply.sale_id, "Reply sent"),
                Err(e) => error!(error = %e, "Cannot serialize outcome"),
            }
        }
        Err(e) => error!(error = %e, "Voice request failed"),
    }
}

async fn handle_stock_count(system: &StoreSystem, input: &str) {
    let mut parts = input.split_whitespace();
    let (Some(code), Some(Ok(counted)), None) = (parts.next(), parts.next().map(str::parse::<u32>), parts.next()) else {
        error!(input, "Expected =<barcode> <count>");
        return;
    };
    match system.count_stock(code, counted).await {
        Ok(product) => println!("Stock de {}: {}", product.name, product.quantity),
        Err(e) => error!(error = %e, "Stock count failed"),
    }
}
