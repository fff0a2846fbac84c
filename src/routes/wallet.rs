//! # Wallet Routes
//!
//! Balance lookups, LP positions and transaction intents:
//! - SUI, USDC and BTC balances for any address or the configured account
//! - Vault shares held by an address, linked to vaults of the loaded season
//! - Deposit / withdraw intents, checked against the loaded season before
//!   they reach the wallet

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::adapter::parse_vault_shares;
use crate::chain::{TransactionIntent, WalletBalances, wallet_balances};
use crate::error::ArenaError;
use crate::models::LpPosition;
use crate::routes::{ApiError, api_error};
use crate::server::ApiState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalanceResponse {
    pub address: String,
    pub balances: WalletBalances,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    pub address: String,
    pub positions: Vec<LpPosition>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub digest: String,
}

/// Sui addresses are 0x followed by up to 64 hex digits.
fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => !hex.is_empty() && hex.len() <= 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

async fn balances_for(state: &ApiState, address: String) -> Result<Json<WalletBalanceResponse>, ApiError> {
    if !is_valid_address(&address) {
        warn!("Rejected malformed address {}", address);
        return Err((StatusCode::BAD_REQUEST, format!("Invalid address: {}", address)));
    }

    let balances = wallet_balances(
        state.chain.as_ref(),
        &address,
        &state.coin_types.usdc,
        &state.coin_types.btc,
    )
    .await
    .map_err(|e| {
        error!("Failed to fetch balances for {}: {}", address, e);
        api_error(e)
    })?;

    Ok(Json(WalletBalanceResponse { address, balances }))
}

async fn positions_for(state: &ApiState, address: String) -> Result<Json<PositionsResponse>, ApiError> {
    if !is_valid_address(&address) {
        warn!("Rejected malformed address {}", address);
        return Err((StatusCode::BAD_REQUEST, format!("Invalid address: {}", address)));
    }

    let objects = state
        .chain
        .get_owned_objects(&address, &state.vault_share_type)
        .await
        .map_err(|e| {
            error!("Failed to fetch vault shares for {}: {}", address, e);
            api_error(e)
        })?;

    let season = state.store.select(|s| s.current_season.clone());
    let positions = parse_vault_shares(&objects, season.as_ref());
    info!("Found {} vault shares for {}", positions.len(), address);

    Ok(Json(PositionsResponse { address, positions }))
}

/// Balances of an arbitrary address
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/api/v1/wallet/{address}/balances`
///
/// # Response
/// ```json
/// {
///   "address": "0x1b",
///   "balances": { "SUI": 1.0, "USDC": 3000.0, "BTC": 0.0 }
/// }
/// ```
///
/// A malformed address is a 400; a failing node is a 502.
pub async fn get_address_balances(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> Result<Json<WalletBalanceResponse>, ApiError> {
    balances_for(&state, address).await
}

/// Balances of the connected account, or 401 when none is configured.
pub async fn get_account_balances(
    State(state): State<ApiState>,
) -> Result<Json<WalletBalanceResponse>, ApiError> {
    let address = state
        .wallet
        .current_account()
        .ok_or_else(|| api_error(ArenaError::WalletNotConnected))?;
    balances_for(&state, address).await
}

/// Vault shares held by an address
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/api/v1/wallet/{address}/positions`
///
/// # Response
/// ```json
/// {
///   "address": "0x1b",
///   "positions": [{
///     "objectId": "0x5e",
///     "aiName": "CLAUDE",
///     "displayName": "Claude Sonnet 4.5",
///     "shares": 25.0,
///     "sharesDisplay": "25.00",
///     "vaultId": "s1-claude"
///   }]
/// }
/// ```
pub async fn get_address_positions(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> Result<Json<PositionsResponse>, ApiError> {
    positions_for(&state, address).await
}

pub async fn get_account_positions(
    State(state): State<ApiState>,
) -> Result<Json<PositionsResponse>, ApiError> {
    let address = state
        .wallet
        .current_account()
        .ok_or_else(|| api_error(ArenaError::WalletNotConnected))?;
    positions_for(&state, address).await
}

/// Validate an intent against the current season, then hand it to the wallet
///
/// # Route
/// - **Method**: POST
/// - **Path**: `/api/v1/intents`
///
/// # Request Body
/// ```json
/// { "kind": "deposit", "seasonNumber": 1, "aiName": "CLAUDE", "amount": 25000000 }
/// ```
///
/// # Errors
/// - 404 when the season is not loaded or has no such AI
/// - 400 when the season status does not allow the intent
/// - 401 / 501 when the wallet cannot sign
pub async fn submit_intent(
    State(state): State<ApiState>,
    Json(intent): Json<TransactionIntent>,
) -> Result<Json<IntentResponse>, ApiError> {
    let season = state
        .store
        .select(|s| s.current_season.clone())
        .filter(|season| season.season_number == intent.season_number())
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("Season {} is not loaded", intent.season_number()),
            )
        })?;

    if !season.ai_models.iter().any(|m| m.name == intent.ai_name()) {
        return Err((
            StatusCode::NOT_FOUND,
            format!(
                "Season {} has no AI named {}",
                season.season_number,
                intent.ai_name()
            ),
        ));
    }

    intent.validate(season.status).map_err(api_error)?;

    let digest = state.wallet.sign_and_execute(&intent).await.map_err(|e| {
        warn!("Intent for {} not executed: {}", intent.ai_name(), e);
        api_error(e)
    })?;

    info!("Executed intent for {}: {}", intent.ai_name(), digest);
    Ok(Json(IntentResponse { digest }))
}

pub fn create_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/v1/wallet/balances", get(get_account_balances))
        .route("/api/v1/wallet/{address}/balances", get(get_address_balances))
        .route("/api/v1/wallet/positions", get(get_account_positions))
        .route("/api/v1/wallet/{address}/positions", get(get_address_positions))
        .route("/api/v1/intents", post(submit_intent))
}
