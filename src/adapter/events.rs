use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::{LiveEvent, Vault};

/// Return steps (in percent) that count as a milestone when crossed upwards.
pub const MILESTONE_STEP_PCT: f64 = 10.0;

/// Initial feed for a fresh session: the most recent trades across all vaults,
/// newest first.
pub fn seed_live_events(vaults: &[Vault], limit: usize) -> Vec<LiveEvent> {
    let mut events: Vec<LiveEvent> = vaults
        .iter()
        .flat_map(|vault| vault.trades.iter().map(move |trade| LiveEvent::trade(vault, trade)))
        .collect();

    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events.truncate(limit);
    events
}

/// Events implied by moving from `previous` to `next`, oldest first so that
/// prepending them one by one leaves the newest at the head of the feed.
///
/// Vaults absent from `previous` produce nothing; they are picked up by the
/// next comparison.
pub fn derive_live_events(previous: &[Vault], next: &[Vault], now: DateTime<Utc>) -> Vec<LiveEvent> {
    let mut events = Vec::new();

    for vault in next {
        let Some(before) = previous.iter().find(|v| v.id == vault.id) else {
            continue;
        };

        let known: HashSet<&str> = before.trades.iter().map(|t| t.id.as_str()).collect();
        events.extend(
            vault
                .trades
                .iter()
                .filter(|trade| !known.contains(trade.id.as_str()))
                .map(|trade| LiveEvent::trade(vault, trade)),
        );

        let before_step = (before.metrics.total_return_percentage / MILESTONE_STEP_PCT).floor();
        let after_step = (vault.metrics.total_return_percentage / MILESTONE_STEP_PCT).floor();
        if vault.metrics.total_return_percentage > 0.0 && after_step > before_step {
            events.push(LiveEvent::milestone(vault, now));
        }

        if let (Some(old_rank), Some(new_rank)) = (before.season_ranking, vault.season_ranking) {
            if old_rank != new_rank {
                events.push(LiveEvent::ranking_change(vault, old_rank, new_rank, now));
            }
        }
    }

    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vault::sample_vault;
    use crate::models::{LiveEventKind, Trade, TradeAction};
    use chrono::Duration;

    fn trade(id: &str, minutes_ago: i64) -> Trade {
        Trade {
            id: id.to_string(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            action: TradeAction::Buy,
            token: "BTC".to_string(),
            amount: 0.01,
            usdc_value: 1000.0,
            entry_price: 100_000.0,
            reasoning: String::new(),
            confidence: 70.0,
            profit: None,
            profit_percentage: None,
            blob_id: None,
        }
    }

    #[test]
    fn seed_is_newest_first_and_bounded() {
        let mut a = sample_vault("a");
        a.trades = vec![trade("a1", 30), trade("a2", 10)];
        let mut b = sample_vault("b");
        b.trades = vec![trade("b1", 20)];

        let events = seed_live_events(&[a, b], 2);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].vault_id, "a");
        assert_eq!(events[1].vault_id, "b");
        assert!(events[0].timestamp > events[1].timestamp);
    }

    #[test]
    fn new_trades_become_trade_events() {
        let mut before = sample_vault("a");
        before.trades = vec![trade("t1", 30)];
        let mut after = before.clone();
        after.trades.push(trade("t3", 5));
        after.trades.push(trade("t2", 10));

        let events = derive_live_events(&[before], &[after], Utc::now());
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind() == LiveEventKind::Trade));
        // Oldest first.
        assert!(events[0].timestamp < events[1].timestamp);
    }

    #[test]
    fn rank_and_milestone_changes_are_reported() {
        let before = sample_vault("a");
        let mut after = before.clone();
        after.season_ranking = Some(2);
        after.metrics.total_return_percentage = 12.0;

        let kinds: Vec<LiveEventKind> = derive_live_events(&[before], &[after], Utc::now())
            .iter()
            .map(LiveEvent::kind)
            .collect();
        assert!(kinds.contains(&LiveEventKind::Milestone));
        assert!(kinds.contains(&LiveEventKind::RankingChange));
    }

    #[test]
    fn unchanged_or_unknown_vaults_emit_nothing() {
        let vault = sample_vault("a");
        assert!(derive_live_events(&[vault.clone()], &[vault.clone()], Utc::now()).is_empty());
        assert!(derive_live_events(&[], &[vault], Utc::now()).is_empty());
    }
}
