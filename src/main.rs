//! # Arena Server
//!
//! HTTP API over the arena dashboard state, kept in sync with the season
//! manager object on Sui.
//!
//! ## Environment Setup
//! Every setting has a testnet default; override any of them in `.env`:
//! ```bash
//! SERVER_PORT=3000
//! SUI_RPC_URL=https://fullnode.testnet.sui.io:443
//! SYNC_INTERVAL_MS=30000
//! RUST_LOG=info
//! ```
//!
//! ## Health Check
//! ```bash
//! curl http://localhost:3000/ping
//! ```

use anyhow::Result;
use arena_server::{config::Config, server};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the process environment still applies.
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();

    tracing::info!("🏁 Starting arena server...");
    tracing::info!("📦 Package: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "🏗️  Build profile: {}",
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );

    let config = Config::from_env()?;
    server::start(config).await
}
