use axum::{Router, extract::State, response::Json, routing::get};
use serde_json::json;

use crate::server::ApiState;
use crate::sync::SyncStats;

/// Health check endpoint handler.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
///
/// ```bash
/// curl http://localhost:3000/ping
/// # Response: {"status":"pong"}
/// ```
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "pong" }))
}

/// Phase and counters of the background season synchronizer.
pub async fn sync_status(State(state): State<ApiState>) -> Json<SyncStats> {
    Json(state.sync.stats().await)
}

pub fn create_routes() -> Router<ApiState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/api/v1/sync/stats", get(sync_status))
}
