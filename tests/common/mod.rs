#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use arena_server::chain::{BlobReader, ChainReader, PriceSource, ReadOnlyWallet, WalletProvider};
use arena_server::error::{ArenaError, Result};
use arena_server::models::{
    AiModelEntry, LiveEvent, MarketData, Season, SeasonStatus, TokenHolding, Trade, TradeAction,
    Vault, VaultMetrics,
};
use arena_server::server::{ApiState, CoinTypes};
use arena_server::store::{AppStore, StoreConfig};
use arena_server::sync::SeasonSync;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use serde_json::{Value, json};

pub const USDC_TYPE: &str = "0xtest::mock_usdc::MOCK_USDC";
pub const BTC_TYPE: &str = "0xtest::mock_btc::MOCK_BTC";
pub const KNOWN_BLOB: &str = "M4hsZGQ1oCktdzegB6HnI6Mi28S2nqOPHxK-W7_4BUk";
pub const SHARE_TYPE: &str = "0xtest::season_manager::VaultShare<0x1::string::String>";
/// Owner whose address holds vault shares on the stub chain.
pub const LP_OWNER: &str = "0x1b";

pub fn vault(id: &str, tvl: f64) -> Vault {
    Vault {
        id: id.to_string(),
        name: format!("{} vault", id),
        ai_model: "CLAUDE".to_string(),
        starting_capital: 3000.0,
        current_usdc_value: tvl,
        tvl,
        holdings: vec![TokenHolding {
            symbol: "USDC".to_string(),
            amount: tvl,
            usdc_value: tvl,
            price_per_token: 1.0,
        }],
        trades: Vec::new(),
        metrics: VaultMetrics::default(),
        personality: None,
        season_ranking: Some(1),
        season_history: Vec::new(),
    }
}

/// Trade made `minutes_ago` before now.
pub fn trade(id: &str, minutes_ago: i64, action: TradeAction, profit: f64) -> Trade {
    Trade {
        id: id.to_string(),
        timestamp: Utc::now() - ChronoDuration::minutes(minutes_ago),
        action,
        token: "BTC".to_string(),
        amount: 0.01,
        usdc_value: 1000.0,
        entry_price: 100_000.0,
        reasoning: "momentum".to_string(),
        confidence: 0.7,
        profit: Some(profit),
        profit_percentage: Some(profit / 10.0),
        blob_id: None,
    }
}

/// Event whose id is `n`, with timestamps increasing with `n`.
pub fn event(n: u64) -> LiveEvent {
    let at = Utc.timestamp_opt(1_700_000_000 + n as i64, 0).unwrap();
    let mut event = LiveEvent::ranking_change(&vault("s1-claude", 3000.0), 2, 1, at);
    event.id = n.to_string();
    event
}

pub fn season(number: u64, status: SeasonStatus) -> Season {
    Season {
        id: format!("season-{}", number),
        season_number: number,
        name: format!("Season {}", number),
        status,
        created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        started_at: None,
        ended_at: None,
        total_trades: 0,
        total_volume: 0.0,
        ai_models: vec![AiModelEntry {
            name: "CLAUDE".to_string(),
            display_name: "Claude Sonnet 4.5".to_string(),
            wallet_address: "0xc1".to_string(),
        }],
        vaults: Vec::new(),
        final_rankings: None,
        total_prize_pool: 0.0,
    }
}

pub struct StubChain;

#[async_trait]
impl ChainReader for StubChain {
    async fn get_object(&self, object_id: &str) -> Result<Value> {
        Err(ArenaError::ObjectNotFound(object_id.to_string()))
    }

    async fn get_balance(&self, _owner: &str, coin_type: &str) -> Result<u128> {
        match coin_type {
            "0x2::sui::SUI" => Ok(1_000_000_000),
            USDC_TYPE => Ok(3_000_000_000),
            _ => Err(ArenaError::Rpc {
                code: -32602,
                message: "unknown coin type".to_string(),
            }),
        }
    }

    async fn get_owned_objects(&self, owner: &str, struct_type: &str) -> Result<Vec<Value>> {
        if owner != LP_OWNER || struct_type != SHARE_TYPE {
            return Ok(Vec::new());
        }
        Ok(vec![
            json!({
                "objectId": "0xshare1",
                "type": SHARE_TYPE,
                "content": { "dataType": "moveObject", "fields": { "name": "CLAUDE", "value": "25000000" } }
            }),
            json!({
                "objectId": "0xshare2",
                "type": SHARE_TYPE,
                "content": { "dataType": "moveObject", "fields": { "name": "LLAMA", "value": "1500000" } }
            }),
        ])
    }
}

pub struct StubBlobs;

#[async_trait]
impl BlobReader for StubBlobs {
    async fn read_json(&self, blob_id: &str) -> Result<Value> {
        if blob_id == KNOWN_BLOB {
            Ok(json!({ "reasoning": "breakout above resistance", "confidence": 82 }))
        } else {
            Err(ArenaError::Upstream {
                status: 500,
                message: "aggregator unavailable".to_string(),
            })
        }
    }

    fn explorer_url(&self, blob_id: &str) -> String {
        format!("https://walruscan.com/testnet/blob/{}", blob_id)
    }
}

pub struct StubPrices;

#[async_trait]
impl PriceSource for StubPrices {
    async fn prices(&self) -> Result<Vec<MarketData>> {
        Ok(Vec::new())
    }

    async fn btc_price(&self) -> f64 {
        100_000.0
    }
}

pub fn api_state(store: Arc<AppStore>, account: Option<&str>) -> ApiState {
    let chain: Arc<dyn ChainReader> = Arc::new(StubChain);
    let wallet: Arc<dyn WalletProvider> = Arc::new(ReadOnlyWallet::new(account.map(str::to_string)));
    let sync = Arc::new(SeasonSync::new(
        store.clone(),
        chain.clone(),
        Arc::new(StubPrices),
        "0xseason",
        Duration::from_secs(60),
    ));

    ApiState {
        store,
        chain,
        blobs: Arc::new(StubBlobs),
        wallet,
        sync,
        coin_types: CoinTypes {
            usdc: USDC_TYPE.to_string(),
            btc: BTC_TYPE.to_string(),
        },
        vault_share_type: SHARE_TYPE.to_string(),
    }
}

pub fn store() -> Arc<AppStore> {
    Arc::new(AppStore::new(StoreConfig::default()))
}
