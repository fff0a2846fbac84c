use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Season lifecycle as stored by the season manager contract (0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeasonStatus {
    PreSeason,
    Active,
    Ended,
}

impl SeasonStatus {
    /// Unknown codes fall back to pre-season, which is what the contract
    /// reports for freshly created seasons.
    pub fn from_code(code: u64) -> Self {
        match code {
            1 => SeasonStatus::Active,
            2 => SeasonStatus::Ended,
            _ => SeasonStatus::PreSeason,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeasonStatus::PreSeason => "Pre-Season",
            SeasonStatus::Active => "Active",
            SeasonStatus::Ended => "Ended",
        }
    }

    /// Deposits are only accepted before trading starts.
    pub fn can_deposit(&self) -> bool {
        matches!(self, SeasonStatus::PreSeason)
    }

    /// Withdrawals are only accepted once the season has ended.
    pub fn can_withdraw(&self) -> bool {
        matches!(self, SeasonStatus::Ended)
    }
}

/// A registered AI model competing in a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiModelEntry {
    pub name: String,
    pub display_name: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonVault {
    pub vault_id: String,
    pub starting_capital: f64,
    pub final_value: Option<f64>,
    #[serde(rename = "return")]
    pub return_amount: Option<f64>,
    pub return_percentage: Option<f64>,
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRanking {
    pub rank: u32,
    pub vault_id: String,
    pub vault_name: String,
    pub ai_model: String,
    pub final_value: f64,
    #[serde(rename = "return")]
    pub return_amount: f64,
    pub return_percentage: f64,
    pub prize: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonResult {
    pub season_id: String,
    pub season_name: String,
    pub rank: u32,
    pub final_value: f64,
    #[serde(rename = "return")]
    pub return_amount: f64,
    pub return_percentage: f64,
    pub prize: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub season_number: u64,
    pub name: String,
    pub status: SeasonStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_trades: u64,
    pub total_volume: f64,
    pub ai_models: Vec<AiModelEntry>,
    pub vaults: Vec<SeasonVault>,
    pub final_rankings: Option<Vec<SeasonRanking>>,
    pub total_prize_pool: f64,
}
