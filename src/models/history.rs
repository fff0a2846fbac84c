use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::vault::Trade;

/// A trade together with the vault and season it was made in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    #[serde(flatten)]
    pub trade: Trade,
    pub vault_id: String,
    pub ai_model: String,
    pub season_number: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiTradeStats {
    pub trades: u64,
    pub profitable: u64,
    pub total_pnl: f64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStats {
    pub total: u64,
    pub profitable: u64,
    pub total_pnl: f64,
    pub win_rate: f64,
    pub by_ai_model: BTreeMap<String, AiTradeStats>,
}

/// One sample of a vault's portfolio value chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}
