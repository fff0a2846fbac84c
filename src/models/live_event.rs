use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::vault::{Trade, TradeAction, Vault};

/// Immutable entry of the live activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub vault_id: String,
    pub vault_name: String,
    pub message: String,
    #[serde(flatten)]
    pub data: LiveEventData,
}

/// Payload of a live event, tagged by its `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LiveEventData {
    Trade(TradeEventData),
    Milestone(MilestoneEventData),
    RankingChange(RankingChangeEventData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveEventKind {
    Trade,
    Milestone,
    RankingChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEventData {
    pub trade_id: String,
    pub action: TradeAction,
    pub token: String,
    pub amount: f64,
    pub usdc_value: f64,
    pub profit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneEventData {
    pub value: f64,
    pub return_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingChangeEventData {
    pub previous_rank: u32,
    pub new_rank: u32,
}

impl LiveEvent {
    pub fn kind(&self) -> LiveEventKind {
        match self.data {
            LiveEventData::Trade(_) => LiveEventKind::Trade,
            LiveEventData::Milestone(_) => LiveEventKind::Milestone,
            LiveEventData::RankingChange(_) => LiveEventKind::RankingChange,
        }
    }

    pub fn trade(vault: &Vault, trade: &Trade) -> Self {
        let verb = match trade.action {
            TradeAction::Buy => "opened a long on",
            TradeAction::Sell => "sold",
        };

        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: trade.timestamp,
            vault_id: vault.id.clone(),
            vault_name: vault.name.clone(),
            message: format!("{} {} {}", vault.name, verb, trade.token),
            data: LiveEventData::Trade(TradeEventData {
                trade_id: trade.id.clone(),
                action: trade.action,
                token: trade.token.clone(),
                amount: trade.amount,
                usdc_value: trade.usdc_value,
                profit: trade.profit,
            }),
        }
    }

    pub fn milestone(vault: &Vault, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            vault_id: vault.id.clone(),
            vault_name: vault.name.clone(),
            message: format!(
                "{} reached {:+.1}% return",
                vault.name, vault.metrics.total_return_percentage
            ),
            data: LiveEventData::Milestone(MilestoneEventData {
                value: vault.current_usdc_value,
                return_percentage: vault.metrics.total_return_percentage,
            }),
        }
    }

    pub fn ranking_change(
        vault: &Vault,
        previous_rank: u32,
        new_rank: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let direction = if new_rank < previous_rank { "up" } else { "down" };

        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            vault_id: vault.id.clone(),
            vault_name: vault.name.clone(),
            message: format!(
                "{} moved {} in rankings ({} -> {})",
                vault.name, direction, previous_rank, new_rank
            ),
            data: LiveEventData::RankingChange(RankingChangeEventData {
                previous_rank,
                new_rank,
            }),
        }
    }
}
