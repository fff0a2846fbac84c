//! Parsing of the season manager object returned by the RPC node.
//!
//! The object is a `VecMap<u64, Season>`; each season carries its registered AI
//! models and a `VecMap<String, AIVault>` with balances and trade history.
//! Move structs come back as `{ "type": .., "fields": { .. } }` and u64 values as
//! decimal strings, so every accessor here tolerates both shapes.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::adapter::units::{PRICE_DECIMALS, Token, from_base_units, scale_down};
use crate::adapter::{decode_blob_id, model_display_name};
use crate::error::{ArenaError, Result};
use crate::models::{
    AiModelEntry, Season, SeasonRanking, SeasonStatus, SeasonVault, TokenHolding, Trade,
    TradeAction, Vault, VaultMetrics,
};

/// Capital every vault is seeded with at season start, in USDC.
pub const INITIAL_VAULT_DEPOSIT: f64 = 3000.0;

/// One season together with the vaults competing in it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSnapshot {
    pub season: Season,
    pub vaults: Vec<Vault>,
}

/// Parse every season in the season manager object, newest season first.
/// Entries that cannot be read are skipped.
pub fn parse_seasons(object: &Value, btc_price: f64) -> Result<Vec<SeasonSnapshot>> {
    let fields = object.pointer("/content/fields").ok_or_else(|| {
        ArenaError::ObjectNotFound(
            object
                .get("objectId")
                .and_then(Value::as_str)
                .unwrap_or("season manager")
                .to_string(),
        )
    })?;

    let entries = fields
        .get("seasons")
        .and_then(map_contents)
        .ok_or_else(|| ArenaError::MalformedObject("season map is missing".to_string()))?;

    let mut snapshots: Vec<SeasonSnapshot> = entries
        .iter()
        .filter_map(|entry| match parse_season_entry(entry, btc_price) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Skipping unreadable season entry: {}", e);
                None
            }
        })
        .collect();

    snapshots.sort_by(|a, b| b.season.season_number.cmp(&a.season.season_number));
    Ok(snapshots)
}

fn parse_season_entry(entry: &Value, btc_price: f64) -> Result<SeasonSnapshot> {
    let entry = fields_of(entry);
    let season_number = entry
        .get("key")
        .and_then(as_u128)
        .and_then(|key| u64::try_from(key).ok())
        .ok_or_else(|| ArenaError::MalformedObject("season key is not a u64".to_string()))?;
    let data = entry
        .get("value")
        .map(fields_of)
        .ok_or_else(|| ArenaError::MalformedObject(format!("season {} has no value", season_number)))?;

    let status = SeasonStatus::from_code(u128_field(data, "status") as u64);

    let ai_models: Vec<AiModelEntry> = data
        .get("ai_models")
        .and_then(Value::as_array)
        .map(|models| {
            models
                .iter()
                .map(fields_of)
                .map(|model| {
                    let name = str_field(model, "name").to_string();
                    AiModelEntry {
                        display_name: model_display_name(&name).to_string(),
                        wallet_address: str_field(model, "wallet_address").to_string(),
                        name,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let vault_entries = data.get("ai_vaults").and_then(map_contents).unwrap_or(&[]);
    debug!("Season {}: {} vault entries found", season_number, vault_entries.len());

    let mut vaults: Vec<Vault> = ai_models
        .iter()
        .map(|model| {
            let vault_data = vault_entries
                .iter()
                .map(fields_of)
                .find(|vault| str_field(vault, "key") == model.name)
                .and_then(|vault| vault.get("value"))
                .map(fields_of);
            build_vault(season_number, model, vault_data, btc_price)
        })
        .collect();

    rank_vaults(&mut vaults);

    let ended = status == SeasonStatus::Ended;
    let season_vaults = vaults
        .iter()
        .map(|vault| SeasonVault {
            vault_id: vault.id.clone(),
            starting_capital: vault.starting_capital,
            final_value: ended.then_some(vault.tvl),
            return_amount: Some(vault.metrics.total_return),
            return_percentage: Some(vault.metrics.total_return_percentage),
            rank: vault.season_ranking,
        })
        .collect::<Vec<_>>();

    let final_rankings = ended.then(|| {
        vaults
            .iter()
            .map(|vault| SeasonRanking {
                rank: vault.season_ranking.unwrap_or_default(),
                vault_id: vault.id.clone(),
                vault_name: vault.name.clone(),
                ai_model: vault.ai_model.clone(),
                final_value: vault.tvl,
                return_amount: vault.metrics.total_return,
                return_percentage: vault.metrics.total_return_percentage,
                prize: 0.0,
            })
            .collect::<Vec<_>>()
    });

    let season = Season {
        id: format!("season-{}", season_number),
        season_number,
        name: format!("Season {}", season_number),
        status,
        created_at: timestamp_ms(u128_field(data, "created_at")).unwrap_or_default(),
        started_at: timestamp_ms(u128_field(data, "started_at")),
        ended_at: timestamp_ms(u128_field(data, "ended_at")),
        total_trades: u128_field(data, "total_trades") as u64,
        total_volume: from_base_units(u128_field(data, "total_volume"), Token::Usdc),
        ai_models,
        vaults: season_vaults,
        final_rankings,
        total_prize_pool: from_base_units(u128_field(data, "prize_pool"), Token::Usdc),
    };

    Ok(SeasonSnapshot { season, vaults })
}

fn build_vault(
    season_number: u64,
    model: &AiModelEntry,
    vault_data: Option<&Value>,
    btc_price: f64,
) -> Vault {
    let id = vault_id(season_number, &model.name);

    let (usdc_raw, btc_raw, history) = match vault_data {
        Some(data) => (
            u128_field(data, "usdc_balance"),
            u128_field(data, "btc_balance"),
            data.get("trade_history").and_then(Value::as_array).cloned().unwrap_or_default(),
        ),
        None => (0, 0, Vec::new()),
    };

    let usdc_balance = from_base_units(usdc_raw, Token::Usdc);
    let btc_amount = from_base_units(btc_raw, Token::Btc);
    let btc_value = btc_amount * btc_price;
    let tvl = usdc_balance + btc_value;

    let trades: Vec<Trade> = history
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_trade(&id, index, raw, btc_price))
        .collect();

    let profitable = trades.iter().filter(|t| t.profit.is_some_and(|p| p > 0.0)).count();
    let win_rate = if trades.is_empty() {
        0.0
    } else {
        profitable as f64 / trades.len() as f64 * 100.0
    };
    let average_trade_size = if trades.is_empty() {
        0.0
    } else {
        trades.iter().map(|t| t.usdc_value).sum::<f64>() / trades.len() as f64
    };

    // A model without a vault entry has not been funded yet.
    let (pnl, pnl_percentage) = if vault_data.is_some() {
        let pnl = tvl - INITIAL_VAULT_DEPOSIT;
        (pnl, pnl / INITIAL_VAULT_DEPOSIT * 100.0)
    } else {
        (0.0, 0.0)
    };

    debug!(
        "Vault {}: USDC={:.2}, BTC={:.8}, TVL={:.2}, PnL={:.2}, win rate={:.2}%",
        id, usdc_balance, btc_amount, tvl, pnl, win_rate
    );

    Vault {
        id,
        name: model.display_name.clone(),
        ai_model: model.name.clone(),
        starting_capital: INITIAL_VAULT_DEPOSIT,
        current_usdc_value: tvl,
        tvl,
        holdings: vec![
            TokenHolding {
                symbol: Token::Usdc.symbol().to_string(),
                amount: usdc_balance,
                usdc_value: usdc_balance,
                price_per_token: 1.0,
            },
            TokenHolding {
                symbol: Token::Btc.symbol().to_string(),
                amount: btc_amount,
                usdc_value: btc_value,
                price_per_token: btc_price,
            },
        ],
        metrics: VaultMetrics {
            total_return: pnl,
            total_return_percentage: pnl_percentage,
            win_rate,
            total_trades: trades.len() as u64,
            average_trade_size,
            max_drawdown: 0.0,
            sharpe_ratio: 0.0,
            current_holdings_value: btc_value,
            usdc_balance,
        },
        trades,
        personality: None,
        season_ranking: None,
        season_history: Vec::new(),
    }
}

/// Trades are append-only on chain, so `(vault, index)` is a stable identity.
fn parse_trade(vault_id: &str, index: usize, raw: &Value, btc_price: f64) -> Trade {
    let fields = fields_of(raw);
    let timestamp_raw = u128_field(fields, "timestamp");
    let side = str_field(fields, "action").to_ascii_uppercase();

    let action = match side.as_str() {
        "LONG" | "BUY" => TradeAction::Buy,
        _ => TradeAction::Sell,
    };

    let token = str_field(fields, "pair")
        .split('/')
        .next()
        .filter(|symbol| !symbol.is_empty())
        .unwrap_or(Token::Btc.symbol())
        .to_string();

    let usdc_value = from_base_units(u128_field(fields, "usdc_amount"), Token::Usdc);
    let amount = from_base_units(u128_field(fields, "btc_amount"), Token::Btc);
    let entry_price = scale_down(u128_field(fields, "entry_price"), PRICE_DECIMALS);

    let move_per_unit = match side.as_str() {
        "LONG" | "BUY" => Some(btc_price - entry_price),
        "SHORT" => Some(entry_price - btc_price),
        _ => None,
    }
    .filter(|_| entry_price > 0.0);

    Trade {
        id: format!("{}:{}:{}", vault_id, timestamp_raw, index),
        timestamp: timestamp_ms(timestamp_raw).unwrap_or_default(),
        action,
        token,
        amount,
        usdc_value,
        entry_price,
        reasoning: str_field(fields, "reasoning").to_string(),
        confidence: fields.get("confidence").and_then(as_f64).unwrap_or(0.0),
        profit: move_per_unit.map(|delta| delta * amount),
        profit_percentage: move_per_unit.map(|delta| delta / entry_price * 100.0),
        blob_id: fields.get("walrus_blob_id").and_then(decode_blob_id),
    }
}

/// Assign 1-based ranks by TVL and order the vaults best first.
fn rank_vaults(vaults: &mut [Vault]) {
    vaults.sort_by(|a, b| b.tvl.total_cmp(&a.tvl));
    for (index, vault) in vaults.iter_mut().enumerate() {
        vault.season_ranking = Some(index as u32 + 1);
    }
}

pub fn vault_id(season_number: u64, model_name: &str) -> String {
    format!("s{}-{}", season_number, model_name.to_ascii_lowercase())
}

fn fields_of(value: &Value) -> &Value {
    value.get("fields").unwrap_or(value)
}

/// Entries of a Move `VecMap`, found either at `contents` or `fields.contents`.
fn map_contents(map: &Value) -> Option<&[Value]> {
    map.get("contents")
        .or_else(|| map.pointer("/fields/contents"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn u128_field(value: &Value, key: &str) -> u128 {
    value.get(key).and_then(as_u128).unwrap_or(0)
}

pub(crate) fn as_u128(value: &Value) -> Option<u128> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64().map(u128::from),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn timestamp_ms(ms: u128) -> Option<DateTime<Utc>> {
    if ms == 0 {
        return None;
    }
    i64::try_from(ms).ok().and_then(DateTime::<Utc>::from_timestamp_millis)
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BTC_PRICE: f64 = 100_000.0;

    #[test]
    fn parses_seasons_newest_first() {
        let snapshots = parse_seasons(&fixtures::season_object(0), BTC_PRICE).unwrap();
        let numbers: Vec<u64> = snapshots.iter().map(|s| s.season.season_number).collect();
        assert_eq!(numbers, vec![1, 0]);

        let latest = &snapshots[0].season;
        assert_eq!(latest.status, SeasonStatus::Active);
        assert_eq!(latest.name, "Season 1");
        assert_eq!(latest.total_trades, 2);
        assert_eq!(latest.total_volume, 1000.0);
        assert!(latest.started_at.is_some());
        assert!(latest.ended_at.is_none());
        assert!(latest.final_rankings.is_none());
        assert_eq!(latest.ai_models[0].display_name, "Claude Sonnet 4.5");

        assert_eq!(snapshots[1].season.status, SeasonStatus::Ended);
        assert!(snapshots[1].season.final_rankings.is_some());
    }

    #[test]
    fn computes_tvl_pnl_and_ranking() {
        let snapshots = parse_seasons(&fixtures::season_object(0), BTC_PRICE).unwrap();
        let vaults = &snapshots[0].vaults;

        // NOVA: 3000 USDC + 0.02 BTC; CLAUDE: 2500 USDC + 0.01 BTC.
        assert_eq!(vaults[0].ai_model, "NOVA");
        assert!((vaults[0].tvl - 5000.0).abs() < 1e-6);
        assert_eq!(vaults[0].season_ranking, Some(1));
        assert_eq!(vaults[1].ai_model, "CLAUDE");
        assert!((vaults[1].tvl - 3500.0).abs() < 1e-6);
        assert!((vaults[1].metrics.total_return - 500.0).abs() < 1e-6);
        assert!((vaults[1].metrics.total_return_percentage - 16.666_666).abs() < 1e-3);
        assert_eq!(vaults[1].season_ranking, Some(2));
        assert_eq!(vaults[1].id, "s1-claude");
    }

    #[test]
    fn trade_history_drives_win_rate() {
        // Entry at 90_000 with price at 100_000: LONG wins, SHORT loses.
        let snapshots = parse_seasons(&fixtures::season_object(4), BTC_PRICE).unwrap();
        let claude = snapshots[0]
            .vaults
            .iter()
            .find(|v| v.ai_model == "CLAUDE")
            .unwrap();

        assert_eq!(claude.trades.len(), 4);
        assert_eq!(claude.metrics.total_trades, 4);
        assert!((claude.metrics.win_rate - 50.0).abs() < 1e-9);
        assert!((claude.metrics.average_trade_size - 500.0).abs() < 1e-9);

        let first = &claude.trades[0];
        assert_eq!(first.action, TradeAction::Buy);
        assert_eq!(first.token, "BTC");
        assert!((first.entry_price - 90_000.0).abs() < 1e-6);
        assert!((first.profit.unwrap() - 50.0).abs() < 1e-6);
        assert_eq!(first.blob_id.as_deref(), Some("blob-abcdefghijk"));
        assert_eq!(first.id, "s1-claude:1700000000000:0");
        assert_eq!(claude.trades[1].action, TradeAction::Sell);
        assert!(claude.trades[1].profit.unwrap() < 0.0);
    }

    #[test]
    fn models_without_vault_data_get_empty_vaults() {
        let mut object = fixtures::season_object(0);
        object["content"]["fields"]["seasons"]["fields"]["contents"][0]["fields"]["value"]["fields"]
            ["ai_models"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "name": "LLAMA", "wallet_address": "0xl1" }));

        let snapshots = parse_seasons(&object, BTC_PRICE).unwrap();
        let llama = snapshots[0]
            .vaults
            .iter()
            .find(|v| v.ai_model == "LLAMA")
            .unwrap();
        assert_eq!(llama.tvl, 0.0);
        assert_eq!(llama.season_ranking, Some(3));
        assert_eq!(llama.metrics.total_return, 0.0);
        assert_eq!(llama.metrics.total_return_percentage, 0.0);
        assert_eq!(llama.metrics.win_rate, 0.0);
    }

    #[test]
    fn season_keys_beyond_u64_are_skipped() {
        let object = json!({
            "content": { "fields": { "seasons": { "contents": [
                { "fields": { "key": "18446744073709551616", "value": { "fields": { "status": "0" } } } },
                { "fields": { "key": "2", "value": { "fields": { "status": "0" } } } }
            ] } } }
        });

        let snapshots = parse_seasons(&object, BTC_PRICE).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].season.season_number, 2);
    }

    #[test]
    fn missing_content_is_an_error() {
        let err = parse_seasons(&json!({ "objectId": "0xabc" }), BTC_PRICE).unwrap_err();
        assert!(matches!(err, ArenaError::ObjectNotFound(id) if id == "0xabc"));
    }

    #[test]
    fn unreadable_entries_are_skipped() {
        let object = json!({
            "content": { "fields": { "seasons": { "contents": [
                { "fields": { "key": "not-a-number", "value": {} } },
                { "fields": { "key": "3", "value": { "fields": { "status": "0" } } } }
            ] } } }
        });

        let snapshots = parse_seasons(&object, BTC_PRICE).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].season.season_number, 3);
        assert_eq!(snapshots[0].season.status, SeasonStatus::PreSeason);
        assert!(snapshots[0].vaults.is_empty());
    }
}
