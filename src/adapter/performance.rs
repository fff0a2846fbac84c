use chrono::{DateTime, Utc};

use crate::models::{PerformancePoint, TradeAction, Vault};
use crate::store::TimeRange;

/// Portfolio value of `vault` sampled over `range`, oldest first.
///
/// Trades are replayed from the starting capital: a buy spends its USDC on
/// BTC and a sell does the reverse, each valued at the trade's entry price.
/// A sample takes the value after the last trade at or before it, and the
/// final sample is the vault's current TVL.
pub fn portfolio_series(vault: &Vault, range: TimeRange, now: DateTime<Utc>) -> Vec<PerformancePoint> {
    let mut trades: Vec<_> = vault.trades.iter().collect();
    trades.sort_by_key(|trade| trade.timestamp);

    let mut usdc = vault.starting_capital;
    let mut btc = 0.0;
    let replayed: Vec<(DateTime<Utc>, f64)> = trades
        .into_iter()
        .map(|trade| {
            match trade.action {
                TradeAction::Buy => {
                    usdc -= trade.usdc_value;
                    btc += trade.amount;
                }
                TradeAction::Sell => {
                    usdc += trade.usdc_value;
                    btc -= trade.amount;
                }
            }
            (trade.timestamp, usdc + btc * trade.entry_price)
        })
        .collect();

    let count = range.sample_count();
    let spacing = range.sample_spacing();

    (0..count)
        .map(|i| {
            let timestamp = now - spacing * (count - 1 - i) as i32;
            let value = if i + 1 == count {
                vault.tvl
            } else {
                replayed
                    .iter()
                    .take_while(|(at, _)| *at <= timestamp)
                    .last()
                    .map(|(_, value)| *value)
                    .unwrap_or(vault.starting_capital)
            };
            PerformancePoint { timestamp, value }
        })
        .collect()
}
