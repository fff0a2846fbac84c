//! # Models Module
//!
//! Typed schemas for everything the dashboard state holds. Seasons and market
//! data are snapshots replaced wholesale; vaults are merged field by field via
//! [`VaultPatch`]; live events are immutable once created.

pub mod history;
pub mod live_event;
pub mod market_data;
pub mod position;
pub mod season;
pub mod vault;

pub use history::{AiTradeStats, PerformancePoint, TradeRecord, TradeStats};

pub use live_event::{
    LiveEvent, LiveEventData, LiveEventKind, MilestoneEventData, RankingChangeEventData,
    TradeEventData,
};
pub use market_data::MarketData;
pub use position::LpPosition;
pub use season::{AiModelEntry, Season, SeasonRanking, SeasonResult, SeasonStatus, SeasonVault};
pub use vault::{
    AiPersonality, RiskTolerance, TokenHolding, Trade, TradeAction, TradeFrequency, Vault,
    VaultMetrics, VaultPatch,
};
