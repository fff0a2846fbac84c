//! # Chain Module
//!
//! Interfaces to the external services the dashboard reads from. The store
//! never talks to these directly: callers await them and dispatch the result.
//!
//! - `sui_rpc`: blockchain read API (JSON-RPC)
//! - `walrus`: object-storage reads for trade provenance records
//! - `price_feed`: market prices with a short-lived cache
//! - `wallet`: account provider and transaction intents

pub mod price_feed;
pub mod sui_rpc;
pub mod wallet;
pub mod walrus;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::MarketData;

pub use price_feed::PriceApiClient;
pub use sui_rpc::SuiRpcClient;
pub use wallet::{ReadOnlyWallet, TransactionIntent, WalletBalances, WalletProvider, wallet_balances};
pub use walrus::WalrusClient;

/// Blockchain read API.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Object data (including `content`) for an object id.
    async fn get_object(&self, object_id: &str) -> Result<Value>;

    /// Total balance of `coin_type` held by `owner`, in base units.
    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<u128>;

    /// Every object of `struct_type` owned by `owner`.
    async fn get_owned_objects(&self, owner: &str, struct_type: &str) -> Result<Vec<Value>>;
}

/// Object-storage read API.
#[async_trait]
pub trait BlobReader: Send + Sync {
    async fn read_json(&self, blob_id: &str) -> Result<Value>;

    /// Public explorer link for a blob.
    fn explorer_url(&self, blob_id: &str) -> String;
}

/// Market price source.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn prices(&self) -> Result<Vec<MarketData>>;

    /// Current BTC price. Never fails; falls back to a configured default.
    async fn btc_price(&self) -> f64;
}
