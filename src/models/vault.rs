use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::season::SeasonResult;

/// One AI model's vault inside a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub id: String,
    pub name: String,
    pub ai_model: String,
    pub starting_capital: f64,
    pub current_usdc_value: f64,
    pub tvl: f64,
    pub holdings: Vec<TokenHolding>,
    pub trades: Vec<Trade>,
    pub metrics: VaultMetrics,
    pub personality: Option<AiPersonality>,
    pub season_ranking: Option<u32>,
    pub season_history: Vec<SeasonResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolding {
    pub symbol: String,
    pub amount: f64,
    pub usdc_value: f64,
    pub price_per_token: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: TradeAction,
    pub token: String,
    pub amount: f64,
    pub usdc_value: f64,
    pub entry_price: f64,
    pub reasoning: String,
    pub confidence: f64,
    pub profit: Option<f64>,
    pub profit_percentage: Option<f64>,
    /// Object-storage blob holding the full provenance record of this trade.
    pub blob_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultMetrics {
    pub total_return: f64,
    pub total_return_percentage: f64,
    pub win_rate: f64,
    pub total_trades: u64,
    pub average_trade_size: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub current_holdings_value: f64,
    pub usdc_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
    Scalper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TradeFrequency {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiPersonality {
    pub name: String,
    pub description: String,
    pub risk_tolerance: RiskTolerance,
    pub typical_trade_size: f64,
    pub trade_frequency: TradeFrequency,
    pub confidence_range: (f64, f64),
    pub reasoning_style: String,
}

/// Partial vault update. Every `Some` field overwrites the vault's field, every
/// `None` leaves it alone. The id is never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultPatch {
    pub name: Option<String>,
    pub ai_model: Option<String>,
    pub starting_capital: Option<f64>,
    pub current_usdc_value: Option<f64>,
    pub tvl: Option<f64>,
    pub holdings: Option<Vec<TokenHolding>>,
    pub trades: Option<Vec<Trade>>,
    pub metrics: Option<VaultMetrics>,
    pub personality: Option<AiPersonality>,
    pub season_ranking: Option<u32>,
    pub season_history: Option<Vec<SeasonResult>>,
}

impl VaultPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Vault {
    /// Shallow merge: fields absent from the patch keep their current value.
    pub fn merged(&self, patch: &VaultPatch) -> Vault {
        let mut next = self.clone();

        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(ai_model) = &patch.ai_model {
            next.ai_model = ai_model.clone();
        }
        if let Some(starting_capital) = patch.starting_capital {
            next.starting_capital = starting_capital;
        }
        if let Some(current_usdc_value) = patch.current_usdc_value {
            next.current_usdc_value = current_usdc_value;
        }
        if let Some(tvl) = patch.tvl {
            next.tvl = tvl;
        }
        if let Some(holdings) = &patch.holdings {
            next.holdings = holdings.clone();
        }
        if let Some(trades) = &patch.trades {
            next.trades = trades.clone();
        }
        if let Some(metrics) = &patch.metrics {
            next.metrics = metrics.clone();
        }
        if let Some(personality) = &patch.personality {
            next.personality = Some(personality.clone());
        }
        if let Some(rank) = patch.season_ranking {
            next.season_ranking = Some(rank);
        }
        if let Some(history) = &patch.season_history {
            next.season_history = history.clone();
        }

        next
    }
}

#[cfg(test)]
pub(crate) fn sample_vault(id: &str) -> Vault {
    Vault {
        id: id.to_string(),
        name: format!("{} vault", id),
        ai_model: "CLAUDE".to_string(),
        starting_capital: 3000.0,
        current_usdc_value: 3000.0,
        tvl: 3000.0,
        holdings: vec![TokenHolding {
            symbol: "USDC".to_string(),
            amount: 3000.0,
            usdc_value: 3000.0,
            price_per_token: 1.0,
        }],
        trades: Vec::new(),
        metrics: VaultMetrics::default(),
        personality: None,
        season_ranking: Some(1),
        season_history: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_only_touches_patched_fields() {
        let vault = sample_vault("claude");
        let patch = VaultPatch {
            tvl: Some(500.0),
            ..Default::default()
        };

        let merged = vault.merged(&patch);

        assert_eq!(merged.tvl, 500.0);
        assert_eq!(merged.name, vault.name);
        assert_eq!(merged.holdings, vault.holdings);
        assert_eq!(merged.season_ranking, vault.season_ranking);
    }

    #[test]
    fn empty_patch_is_identity() {
        let vault = sample_vault("nova");
        assert!(VaultPatch::default().is_empty());
        assert_eq!(vault.merged(&VaultPatch::default()), vault);
    }

    #[test]
    fn patch_deserializes_from_partial_json() {
        let patch: VaultPatch =
            serde_json::from_str(r#"{"tvl": 42.5, "seasonRanking": 2}"#).unwrap();
        assert_eq!(patch.tvl, Some(42.5));
        assert_eq!(patch.season_ranking, Some(2));
        assert!(patch.name.is_none());
    }
}
