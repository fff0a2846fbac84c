// # Routes Module
//
// HTTP route handlers for the arena dashboard, grouped by functionality.
// Each submodule exposes `create_routes()` which `server.rs` merges.
//
// - `health`: liveness and synchronizer status
// - `state`: store snapshot, vault selection, time range, live events
// - `trades`: trade provenance records from object storage
// - `wallet`: balances and transaction intents

use axum::http::StatusCode;

use crate::error::ArenaError;

/// Health check and monitoring endpoints
pub mod health;

/// Store snapshot and dashboard controls
pub mod state;

/// Trade provenance endpoints
pub mod trades;

/// Wallet balances and intents
pub mod wallet;

/// Error shape shared by every handler.
pub type ApiError = (StatusCode, String);

/// Map a collaborator failure onto the status code the API reports.
pub fn api_error(error: ArenaError) -> ApiError {
    let status = match &error {
        ArenaError::InvalidBlobId(_)
        | ArenaError::DepositBelowMinimum { .. }
        | ArenaError::SeasonClosed { .. } => StatusCode::BAD_REQUEST,
        ArenaError::BlobNotFound(_) | ArenaError::ObjectNotFound(_) | ArenaError::UnknownVault(_) => {
            StatusCode::NOT_FOUND
        }
        ArenaError::WalletNotConnected => StatusCode::UNAUTHORIZED,
        ArenaError::SigningUnavailable => StatusCode::NOT_IMPLEMENTED,
        ArenaError::Http(_)
        | ArenaError::Upstream { .. }
        | ArenaError::Rpc { .. }
        | ArenaError::Serialization(_)
        | ArenaError::MalformedObject(_) => StatusCode::BAD_GATEWAY,
        ArenaError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(
            api_error(ArenaError::InvalidBlobId("x".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            api_error(ArenaError::BlobNotFound("x".into())).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            api_error(ArenaError::Upstream {
                status: 500,
                message: "down".into()
            })
            .0,
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(api_error(ArenaError::WalletNotConnected).0, StatusCode::UNAUTHORIZED);
    }
}
