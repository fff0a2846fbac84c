//! # Adapter Module
//!
//! Turns raw JSON objects from the RPC node into the typed models the store
//! holds, and derives live feed events from successive vault snapshots.
//! Also builds the read-side views over stored vaults: trade history with
//! win-rate stats, and portfolio value charts.

pub mod events;
pub mod history;
pub mod performance;
pub mod positions;
pub mod season;
pub mod units;

use serde_json::Value;

pub use events::{derive_live_events, seed_live_events};
pub use history::{TradeFilter, trade_history, trade_stats};
pub use performance::portfolio_series;
pub use positions::parse_vault_shares;
pub use season::{INITIAL_VAULT_DEPOSIT, SeasonSnapshot, parse_seasons};
pub use units::{Token, format_amount, from_base_units, to_base_units};

const MODEL_NAMES: [(&str, &str); 3] = [
    ("CLAUDE", "Claude Sonnet 4.5"),
    ("NOVA", "Amazon Nova Pro"),
    ("LLAMA", "Llama 4 Maverick"),
];

/// Human readable name of a contract model id. Unknown ids are returned as-is.
pub fn model_display_name(contract_name: &str) -> &str {
    MODEL_NAMES
        .iter()
        .find(|(id, _)| *id == contract_name)
        .map(|(_, display)| *display)
        .unwrap_or(contract_name)
}

/// Contract model id for a display name. Unknown names are returned as-is.
pub fn contract_model_name(display_name: &str) -> &str {
    MODEL_NAMES
        .iter()
        .find(|(_, display)| *display == display_name)
        .map(|(id, _)| *id)
        .unwrap_or(display_name)
}

pub fn is_known_model(contract_name: &str) -> bool {
    MODEL_NAMES.iter().any(|(id, _)| *id == contract_name)
}

/// Blob ids are stored on chain as a `vector<u8>` holding UTF-8 text.
pub fn decode_blob_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) if !items.is_empty() => {
            let bytes: Option<Vec<u8>> = items
                .iter()
                .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect();
            bytes
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .filter(|s| !s.is_empty())
        }
        _ => None,
    }
}
