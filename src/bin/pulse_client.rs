//! Country Pulse Client
//!
//! Runs one aggregation against a running Country Pulse server and prints
//! the result. The run is awaited to completion before the process exits,
//! so there is never more than one run in flight.
//!
//! Usage:
//!   cargo run --bin pulse_client
//!   cargo run --bin pulse_client -- --json
//!
//! Environment:
//!   PULSE_API_URL - Server base URL (default: http://localhost:3000)
//!   RUST_LOG      - Log filter (default: warn)

use country_pulse::providers::http::build_client;
use country_pulse::utils::constants::DEFAULT_UPSTREAM_TIMEOUT_SECS;
use country_pulse::{render_page, render_text, Aggregator, BackendClient};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let base_url =
        std::env::var("PULSE_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let as_json = std::env::args().skip(1).any(|a| a == "--json");

    // Each backend route may itself wait on an upstream; allow for the chain
    let client = build_client(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS * 2))?;
    let aggregator = Aggregator::new(BackendClient::new(client, base_url.clone()));

    info!("🧭 Generating profile via {}", base_url);
    let outcome = aggregator.run().await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_text(&render_page(&outcome)));
    }

    if !outcome.is_done() {
        std::process::exit(1);
    }
    Ok(())
}
