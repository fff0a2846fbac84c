//! # State Routes
//!
//! Read and steer the dashboard store: season, vaults, selection, time
//! range, live feed, market data and per-vault performance charts.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adapter::portfolio_series;
use crate::error::ArenaError;
use crate::models::{LiveEvent, MarketData, PerformancePoint, Season, Vault};
use crate::routes::{ApiError, api_error};
use crate::server::ApiState;
use crate::store::{AppState, TimeRange};

/// Request to change the selected vault; `null` clears the selection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectVaultRequest {
    pub vault_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeRequest {
    pub time_range: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeResponse {
    pub time_range: TimeRange,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    pub vault_id: String,
    pub time_range: TimeRange,
    pub points: Vec<PerformancePoint>,
}

/// Full store snapshot
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/api/v1/state`
///
/// # Response
/// ```json
/// {
///   "currentSeason": null,
///   "vaults": [],
///   "liveEvents": [],
///   "marketData": [],
///   "isLoading": false,
///   "selectedVault": null,
///   "timeRange": "24H"
/// }
/// ```
pub async fn get_state(State(state): State<ApiState>) -> Json<AppState> {
    Json(state.store.state())
}

/// Season currently loaded, 404 before the first sync.
pub async fn get_season(State(state): State<ApiState>) -> Result<Json<Season>, ApiError> {
    state
        .store
        .select(|s| s.current_season.clone())
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "No season loaded yet".to_string()))
}

/// Vaults of the loaded season, best TVL first.
pub async fn get_vaults(State(state): State<ApiState>) -> Json<Vec<Vault>> {
    Json(state.store.select(|s| s.vaults.clone()))
}

pub async fn get_vault(
    State(state): State<ApiState>,
    Path(vault_id): Path<String>,
) -> Result<Json<Vault>, ApiError> {
    state
        .store
        .select(|s| s.vault(&vault_id).cloned())
        .map(Json)
        .ok_or_else(|| api_error(ArenaError::UnknownVault(vault_id)))
}

pub async fn get_selected_vault(State(state): State<ApiState>) -> Json<Option<Vault>> {
    Json(state.store.select(|s| s.selected_vault.clone()))
}

/// Select a vault by id, or clear the selection
///
/// # Route
/// - **Method**: POST
/// - **Path**: `/api/v1/vaults/selected`
///
/// # Request Body
/// ```json
/// { "vaultId": "s1-claude" }
/// ```
///
/// Responds with the selected vault, or `null` once cleared. Unknown ids
/// are a 404 and leave the selection as it was.
pub async fn select_vault(
    State(state): State<ApiState>,
    Json(request): Json<SelectVaultRequest>,
) -> Result<Json<Option<Vault>>, ApiError> {
    match request.vault_id {
        Some(vault_id) => match state.store.select_vault_by_id(&vault_id) {
            Some(next) => {
                info!("Selected vault {}", vault_id);
                Ok(Json(next.selected_vault))
            }
            None => {
                warn!("Refusing to select unknown vault {}", vault_id);
                Err(api_error(ArenaError::UnknownVault(vault_id)))
            }
        },
        None => Ok(Json(state.store.set_selected_vault(None).selected_vault)),
    }
}

/// Change the chart time range. Accepts `1H`, `24H`, `7D`, `30D` or `ALL`.
pub async fn set_time_range(
    State(state): State<ApiState>,
    Json(request): Json<TimeRangeRequest>,
) -> Result<Json<TimeRangeResponse>, ApiError> {
    let range: TimeRange = request
        .time_range
        .parse()
        .map_err(|e: String| (StatusCode::BAD_REQUEST, e))?;

    let next = state.store.set_time_range(range);
    Ok(Json(TimeRangeResponse {
        time_range: next.time_range,
    }))
}

/// Live events, newest first
pub async fn get_events(
    State(state): State<ApiState>,
    Query(query): Query<EventsQuery>,
) -> Json<Vec<LiveEvent>> {
    let limit = query.limit.unwrap_or(usize::MAX);
    Json(state.store.select(|s| s.live_events.iter().take(limit).cloned().collect()))
}

pub async fn get_market(State(state): State<ApiState>) -> Json<Vec<MarketData>> {
    Json(state.store.select(|s| s.market_data.clone()))
}

/// Portfolio value chart of one vault
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/api/v1/vaults/{id}/performance`
/// - **Query**: `range` (optional)
///
/// Without `range` the store's current time range is used. The last point
/// is the vault's current TVL.
///
/// # Response
/// ```json
/// {
///   "vaultId": "s1-claude",
///   "timeRange": "1H",
///   "points": [{ "timestamp": "2025-11-02T10:00:00Z", "value": 3000.0 }]
/// }
/// ```
///
/// # Examples
/// ```bash
/// curl http://localhost:3000/api/v1/vaults/s1-claude/performance?range=24H
/// ```
pub async fn get_vault_performance(
    State(state): State<ApiState>,
    Path(vault_id): Path<String>,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<PerformanceResponse>, ApiError> {
    let requested = query
        .range
        .as_deref()
        .map(str::parse::<TimeRange>)
        .transpose()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let (vault, current_range) = state
        .store
        .select(|s| (s.vault(&vault_id).cloned(), s.time_range));
    let vault = vault.ok_or_else(|| api_error(ArenaError::UnknownVault(vault_id.clone())))?;
    let time_range = requested.unwrap_or(current_range);

    Ok(Json(PerformanceResponse {
        points: portfolio_series(&vault, time_range, Utc::now()),
        vault_id,
        time_range,
    }))
}

pub fn create_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/v1/state", get(get_state))
        .route("/api/v1/season", get(get_season))
        .route("/api/v1/vaults", get(get_vaults))
        .route("/api/v1/vaults/selected", get(get_selected_vault).post(select_vault))
        .route("/api/v1/vaults/{id}", get(get_vault))
        .route("/api/v1/vaults/{id}/performance", get(get_vault_performance))
        .route("/api/v1/time-range", post(set_time_range))
        .route("/api/v1/events", get(get_events))
        .route("/api/v1/market", get(get_market))
}
