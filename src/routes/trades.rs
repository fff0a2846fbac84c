//! # Trade Routes
//!
//! Trade history across the vaults of the loaded season, with aggregate and
//! per-AI win rates, and the provenance record behind each trade.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::adapter::{TradeFilter, contract_model_name, is_known_model, trade_history};
use crate::chain::walrus::is_valid_blob_id;
use crate::models::{Season, TradeAction, TradeRecord, TradeStats};
use crate::routes::{ApiError, api_error};
use crate::server::ApiState;
use crate::store::TimeRange;

/// Decision record stored for a trade, with a link to inspect the blob.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeProvenanceResponse {
    pub blob_id: String,
    pub explorer_url: String,
    pub record: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct TradeHistoryQuery {
    pub season: Option<u64>,
    /// Contract id or display name; `all` disables the filter.
    pub ai: Option<String>,
    /// `LONG`/`BUY` or `SHORT`/`SELL`.
    pub action: Option<String>,
    /// One of the dashboard time ranges.
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeHistoryResponse {
    pub trades: Vec<TradeRecord>,
    pub stats: TradeStats,
}

fn parse_ai(ai: &str, season: Option<&Season>) -> Result<Option<String>, ApiError> {
    if ai.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let contract = contract_model_name(ai).to_ascii_uppercase();
    let listed = season.is_some_and(|s| s.ai_models.iter().any(|m| m.name == contract));
    if is_known_model(&contract) || listed {
        Ok(Some(contract))
    } else {
        Err((StatusCode::BAD_REQUEST, format!("Unknown AI model: {}", ai)))
    }
}

fn parse_action(action: &str) -> Result<Option<TradeAction>, ApiError> {
    match action.to_ascii_uppercase().as_str() {
        "ALL" => Ok(None),
        "LONG" | "BUY" => Ok(Some(TradeAction::Buy)),
        "SHORT" | "SELL" => Ok(Some(TradeAction::Sell)),
        _ => Err((StatusCode::BAD_REQUEST, format!("Unknown trade action: {}", action))),
    }
}

fn build_filter(query: &TradeHistoryQuery, season: Option<&Season>) -> Result<TradeFilter, ApiError> {
    let range = query
        .range
        .as_deref()
        .map(str::parse::<TimeRange>)
        .transpose()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    Ok(TradeFilter {
        season: query.season,
        ai_model: query.ai.as_deref().map(|ai| parse_ai(ai, season)).transpose()?.flatten(),
        action: query.action.as_deref().map(parse_action).transpose()?.flatten(),
        since: range.and_then(|r| r.cutoff(Utc::now())),
    })
}

/// Trade history with win-rate stats
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/api/v1/trades`
///
/// Every parameter is optional. Trades come newest first; `stats` covers
/// exactly the trades returned.
///
/// # Query Parameters
/// - `season`: season number; other seasons than the loaded one are empty
/// - `ai`: `CLAUDE`, `Claude Sonnet 4.5`, or `all`
/// - `action`: `LONG`, `SHORT`, or `all`
/// - `range`: `1H`, `24H`, `7D`, `30D`, `ALL`
///
/// # HTTP Status Codes
/// - **200 OK**: history returned, possibly empty
/// - **400 Bad Request**: unknown AI, action or range
///
/// # Response
/// ```json
/// {
///   "trades": [{ "id": "s1-claude:1730000000000:0", "action": "buy", "vaultId": "s1-claude", "aiModel": "CLAUDE", "seasonNumber": 1 }],
///   "stats": {
///     "total": 1, "profitable": 1, "totalPnl": 42.0, "winRate": 100.0,
///     "byAiModel": { "CLAUDE": { "trades": 1, "profitable": 1, "totalPnl": 42.0, "winRate": 100.0 } }
///   }
/// }
/// ```
///
/// # Examples
/// ```bash
/// curl "http://localhost:3000/api/v1/trades?ai=NOVA&action=SHORT"
/// ```
pub async fn get_trade_history(
    State(state): State<ApiState>,
    Query(query): Query<TradeHistoryQuery>,
) -> Result<Json<TradeHistoryResponse>, ApiError> {
    let (season, vaults) = state
        .store
        .select(|s| (s.current_season.clone(), s.vaults.clone()));

    let filter = build_filter(&query, season.as_ref())?;
    let (trades, stats) = trade_history(season.as_ref(), &vaults, &filter);

    Ok(Json(TradeHistoryResponse { trades, stats }))
}

/// Fetch the provenance record of a trade from object storage
///
/// Malformed blob ids are a 400. Aggregator failures map through
/// `api_error`, so a missing blob is a 404 and an outage a 502.
pub async fn get_trade_provenance(
    State(state): State<ApiState>,
    Path(blob_id): Path<String>,
) -> Result<Json<TradeProvenanceResponse>, ApiError> {
    if !is_valid_blob_id(&blob_id) {
        return Err((StatusCode::BAD_REQUEST, format!("Invalid blob id: {}", blob_id)));
    }

    info!("Reading trade provenance {}", blob_id);

    let record = state.blobs.read_json(&blob_id).await.map_err(|e| {
        error!("Failed to read blob {}: {}", blob_id, e);
        api_error(e)
    })?;

    Ok(Json(TradeProvenanceResponse {
        explorer_url: state.blobs.explorer_url(&blob_id),
        blob_id,
        record,
    }))
}

pub fn create_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/v1/trades", get(get_trade_history))
        .route("/api/v1/trades/{blob_id}", get(get_trade_provenance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_names_accept_contract_and_display_forms() {
        assert_eq!(parse_ai("claude", None).unwrap(), Some("CLAUDE".to_string()));
        assert_eq!(parse_ai("Amazon Nova Pro", None).unwrap(), Some("NOVA".to_string()));
        assert_eq!(parse_ai("ALL", None).unwrap(), None);
        assert!(parse_ai("GPT", None).is_err());
    }

    #[test]
    fn actions_map_to_trade_sides() {
        assert_eq!(parse_action("long").unwrap(), Some(TradeAction::Buy));
        assert_eq!(parse_action("SELL").unwrap(), Some(TradeAction::Sell));
        assert!(parse_action("hold").is_err());
    }

    #[test]
    fn ranges_become_cutoffs() {
        let query = TradeHistoryQuery {
            range: Some("ALL".to_string()),
            ..Default::default()
        };
        assert!(build_filter(&query, None).unwrap().since.is_none());

        let query = TradeHistoryQuery {
            range: Some("24h".to_string()),
            ..Default::default()
        };
        assert!(build_filter(&query, None).unwrap().since.is_some());

        let query = TradeHistoryQuery {
            range: Some("2W".to_string()),
            ..Default::default()
        };
        assert!(build_filter(&query, None).is_err());
    }
}
