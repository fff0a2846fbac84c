use chrono::{DateTime, Utc};

use crate::models::{Season, TradeAction, TradeRecord, TradeStats, Vault};

/// Narrows the trade history. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub season: Option<u64>,
    /// Contract model id, e.g. "NOVA".
    pub ai_model: Option<String>,
    pub action: Option<TradeAction>,
    pub since: Option<DateTime<Utc>>,
}

impl TradeFilter {
    fn matches(&self, vault: &Vault, record_time: DateTime<Utc>, action: TradeAction) -> bool {
        self.ai_model.as_deref().is_none_or(|ai| vault.ai_model == ai)
            && self.action.is_none_or(|wanted| wanted == action)
            && self.since.is_none_or(|since| record_time >= since)
    }
}

/// Trades of every vault matching `filter`, newest first, and their stats.
///
/// Vaults always belong to the loaded season, so asking for any other
/// season yields an empty history.
pub fn trade_history(
    season: Option<&Season>,
    vaults: &[Vault],
    filter: &TradeFilter,
) -> (Vec<TradeRecord>, TradeStats) {
    let season_number = season.map(|s| s.season_number);
    if filter.season.is_some() && filter.season != season_number {
        return (Vec::new(), TradeStats::default());
    }

    let mut records: Vec<TradeRecord> = vaults
        .iter()
        .flat_map(|vault| {
            vault
                .trades
                .iter()
                .filter(|trade| filter.matches(vault, trade.timestamp, trade.action))
                .map(|trade| TradeRecord {
                    trade: trade.clone(),
                    vault_id: vault.id.clone(),
                    ai_model: vault.ai_model.clone(),
                    season_number,
                })
        })
        .collect();

    records.sort_by(|a, b| b.trade.timestamp.cmp(&a.trade.timestamp));

    let stats = trade_stats(&records);
    (records, stats)
}

/// Aggregate and per-model counts. A trade is profitable when its profit is
/// positive; trades without a profit count as zero.
pub fn trade_stats(records: &[TradeRecord]) -> TradeStats {
    let mut stats = TradeStats::default();

    for record in records {
        let profit = record.trade.profit.unwrap_or(0.0);
        let won = profit > 0.0;

        stats.total += 1;
        stats.total_pnl += profit;
        let per_ai = stats.by_ai_model.entry(record.ai_model.clone()).or_default();
        per_ai.trades += 1;
        per_ai.total_pnl += profit;

        if won {
            stats.profitable += 1;
            per_ai.profitable += 1;
        }
    }

    stats.win_rate = win_rate(stats.profitable, stats.total);
    for per_ai in stats.by_ai_model.values_mut() {
        per_ai.win_rate = win_rate(per_ai.profitable, per_ai.trades);
    }

    stats
}

fn win_rate(profitable: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        profitable as f64 / total as f64 * 100.0
    }
}
