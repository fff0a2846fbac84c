use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub symbol: String,
    pub price: f64,
    pub change24h: f64,
    pub change24h_percentage: f64,
    pub volume24h: f64,
    pub timestamp: DateTime<Utc>,
}
