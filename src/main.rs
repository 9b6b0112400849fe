//! Country Pulse API Server
//!
//! Usage:
//!   cargo run --bin country_pulse
//!
//! Environment:
//!   PORT          - Server port (default: 3000)
//!   HOST          - Server host (default: 0.0.0.0)
//!   NEWS_API_KEY  - newsapi.org key (news route reports "not configured" without it)
//!   RUST_LOG      - Log filter (default: info)

use country_pulse::{create_router, AppState, Config};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let addr = config.socket_addr()?;

    let state = Arc::new(AppState::new(&config)?);
    let app = create_router(state);

    info!("🚀 Country Pulse API starting on http://{}", addr);
    info!("");
    info!("Endpoints:");
    info!("  GET /api/random-user          - Random person");
    info!("  GET /api/country/:name        - Country metadata");
    info!("  GET /api/exchange-rate/:code  - USD / KZT rates");
    info!("  GET /api/news/:country        - Top 5 headlines");
    info!("  GET /api/profile              - Full aggregation");
    info!("  GET /health                   - Health check");
    info!("");
    if config.news_configured() {
        info!("📰 NEWS_API_KEY configured: Yes");
    } else {
        warn!("📰 NEWS_API_KEY configured: No - Please add to .env file");
    }

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("👋 Country Pulse API shutdown complete");
    Ok(())
}
