//! # Server Module
//!
//! Composition root: builds the store, the chain clients and the season
//! synchronizer, then serves the HTTP API until Ctrl+C.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::chain::{
    BlobReader, ChainReader, PriceApiClient, ReadOnlyWallet, SuiRpcClient, WalletProvider,
    WalrusClient,
};
use crate::config::Config;
use crate::routes;
use crate::store::AppStore;
use crate::sync::SeasonSync;

/// Coin types used for balance lookups.
#[derive(Debug, Clone)]
pub struct CoinTypes {
    pub usdc: String,
    pub btc: String,
}

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<AppStore>,
    pub chain: Arc<dyn ChainReader>,
    pub blobs: Arc<dyn BlobReader>,
    pub wallet: Arc<dyn WalletProvider>,
    pub sync: Arc<SeasonSync>,
    pub coin_types: CoinTypes,
    /// Struct type of LP share tokens, for position lookups.
    pub vault_share_type: String,
}

/// Router with every route module merged and CORS applied.
///
/// Origins that are not valid header values are logged and skipped. Tests
/// build the same router around stub collaborators.
///
/// # Examples
/// ```ignore
/// let app = build_router(state, &["http://localhost:3001".to_string()]);
/// axum::serve(listener, app).await?;
/// ```
pub fn build_router(state: ApiState, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    Router::new()
        .merge(routes::health::create_routes())
        .merge(routes::state::create_routes())
        .merge(routes::trades::create_routes())
        .merge(routes::wallet::create_routes())
        .layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_origin(origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]),
            ),
        )
        .with_state(state)
}

/// Starts the arena HTTP server and the background season sync.
///
/// Builds the chain, storage and price clients from `config`, spawns the
/// synchronizer when enabled and serves until Ctrl+C. On shutdown the
/// synchronizer is stopped before the function returns, so no store update
/// lands after the server is gone.
pub async fn start(config: Config) -> Result<()> {
    let store = Arc::new(AppStore::new(config.store.clone()));

    let chain: Arc<dyn ChainReader> = Arc::new(
        SuiRpcClient::new(&config.chain.rpc_url, config.request_timeout)
            .context("Failed to create Sui RPC client")?,
    );
    let blobs: Arc<dyn BlobReader> = Arc::new(
        WalrusClient::new(
            &config.storage.aggregator_url,
            &config.storage.network,
            config.request_timeout,
        )
        .context("Failed to create Walrus client")?,
    );
    let prices = Arc::new(
        PriceApiClient::new(
            &config.price.api_url,
            config.price.cache_ttl,
            config.price.fallback_btc_price,
            config.request_timeout,
        )
        .context("Failed to create price API client")?,
    );
    let wallet: Arc<dyn WalletProvider> = Arc::new(ReadOnlyWallet::new(config.wallet_address.clone()));

    let sync = Arc::new(SeasonSync::new(
        store.clone(),
        chain.clone(),
        prices,
        &config.chain.season_object_id,
        config.sync.interval,
    ));

    let sync_task = if config.sync.enabled {
        let runner = sync.clone();
        Some(tokio::spawn(async move { runner.start().await }))
    } else {
        warn!("Season sync disabled, store stays empty until data is dispatched");
        None
    };

    let state = ApiState {
        store,
        chain,
        blobs,
        wallet,
        sync: sync.clone(),
        coin_types: CoinTypes {
            usdc: config.chain.usdc_coin_type.clone(),
            btc: config.chain.btc_coin_type.clone(),
        },
        vault_share_type: config.chain.vault_share_type.clone(),
    };

    let app = build_router(state, &config.cors_origins);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    info!("🚀 Arena server starting...");
    info!("📡 Listening on http://{}", addr);
    info!("🏥 Health check available at http://{}/ping", addr);
    info!("📊 Dashboard state available at http://{}/api/v1/state", addr);
    info!("🌐 RPC: {}", config.chain.rpc_url);
    info!("🗄️  Season object: {}", config.chain.season_object_id);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    sync.stop().await;
    if let Some(task) = sync_task {
        if let Err(e) = task.await {
            warn!("Season sync task ended abnormally: {}", e);
        }
    }

    info!("👋 Arena server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
