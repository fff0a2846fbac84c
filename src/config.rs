//! Configuration module for environment variables and application settings

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use url::Url;

use crate::store::{DEFAULT_LIVE_EVENT_CAPACITY, StoreConfig};

pub const DEFAULT_RPC_URL: &str = "https://fullnode.testnet.sui.io:443";
pub const DEFAULT_SEASON_OBJECT_ID: &str =
    "0x323afc98c387c70f9bc8528d7355aa7e520c352778c2406f15962f6e064bb9da";
pub const DEFAULT_USDC_COIN_TYPE: &str =
    "0xa51f1f51ae2e6aa8cc88a1221c4e9da644faccdcd87dde9d2858e042634d285f::mock_usdc::MOCK_USDC";
pub const DEFAULT_BTC_COIN_TYPE: &str =
    "0xa51f1f51ae2e6aa8cc88a1221c4e9da644faccdcd87dde9d2858e042634d285f::mock_btc::MOCK_BTC";
pub const DEFAULT_VAULT_SHARE_TYPE: &str = "0xa51f1f51ae2e6aa8cc88a1221c4e9da644faccdcd87dde9d2858e042634d285f::season_manager::VaultShare<0x1::string::String>";
pub const DEFAULT_AGGREGATOR_URL: &str = "https://aggregator.walrus-testnet.walrus.space";
pub const DEFAULT_PRICE_API_URL: &str =
    "https://kvxdikvk5b.execute-api.ap-southeast-1.amazonaws.com/prod/prices";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,

    /// Sui full node and contract addresses
    pub chain: ChainConfig,

    /// Walrus aggregator used for trade provenance
    pub storage: StorageConfig,

    pub price: PriceConfig,

    pub store: StoreConfig,

    /// Background season synchronizer
    pub sync: SyncConfig,

    /// Dashboard origins allowed by CORS
    pub cors_origins: Vec<String>,

    /// Account used for `/api/v1/wallet/balances` and intents
    pub wallet_address: Option<String>,

    /// Timeout applied to every outbound HTTP request
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub season_object_id: String,
    pub usdc_coin_type: String,
    pub btc_coin_type: String,
    /// Struct type of the LP share tokens minted on deposit
    pub vault_share_type: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub aggregator_url: String,
    /// Network name used in explorer links ("testnet", "mainnet")
    pub network: String,
}

#[derive(Debug, Clone)]
pub struct PriceConfig {
    pub api_url: String,
    pub cache_ttl: Duration,
    /// BTC price used when the API cannot be reached
    pub fallback_btc_price: f64,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub enabled: bool,
    pub interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup. Missing or unparsable
    /// numbers fall back to defaults; malformed URLs are rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let parsed = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let port = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let chain = ChainConfig {
            rpc_url: validated_url("SUI_RPC_URL", var("SUI_RPC_URL", DEFAULT_RPC_URL))?,
            season_object_id: var("SEASON_OBJECT_ID", DEFAULT_SEASON_OBJECT_ID),
            usdc_coin_type: var("USDC_COIN_TYPE", DEFAULT_USDC_COIN_TYPE),
            btc_coin_type: var("BTC_COIN_TYPE", DEFAULT_BTC_COIN_TYPE),
            vault_share_type: var("VAULT_SHARE_TYPE", DEFAULT_VAULT_SHARE_TYPE),
        };
        if !chain.season_object_id.starts_with("0x") {
            return Err(anyhow!(
                "SEASON_OBJECT_ID must be a 0x-prefixed object id, got {}",
                chain.season_object_id
            ));
        }

        let storage = StorageConfig {
            aggregator_url: validated_url(
                "WALRUS_AGGREGATOR_URL",
                var("WALRUS_AGGREGATOR_URL", DEFAULT_AGGREGATOR_URL),
            )?,
            network: var("WALRUS_NETWORK", "testnet"),
        };

        let price = PriceConfig {
            api_url: validated_url("PRICE_API_URL", var("PRICE_API_URL", DEFAULT_PRICE_API_URL))?,
            cache_ttl: Duration::from_secs(parsed("PRICE_CACHE_TTL_SECS", 600)),
            fallback_btc_price: lookup("FALLBACK_BTC_PRICE")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|p| p.is_finite() && *p > 0.0)
                .unwrap_or(95_000.0),
        };

        let cors_origins = var("CORS_ORIGINS", "http://localhost:3001")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            server: ServerConfig {
                host: var("SERVER_HOST", "0.0.0.0"),
                port,
            },
            chain,
            storage,
            price,
            store: StoreConfig {
                live_event_capacity: parsed(
                    "LIVE_EVENT_CAPACITY",
                    DEFAULT_LIVE_EVENT_CAPACITY as u64,
                ) as usize,
            },
            sync: SyncConfig {
                enabled: lookup("SYNC_ENABLED")
                    .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                    .unwrap_or(true),
                interval: Duration::from_millis(parsed("SYNC_INTERVAL_MS", 30_000).max(1_000)),
            },
            cors_origins,
            wallet_address: lookup("WALLET_ADDRESS").filter(|a| !a.trim().is_empty()),
            request_timeout: Duration::from_secs(parsed("REQUEST_TIMEOUT_SECS", 10)),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn validated_url(key: &str, value: String) -> Result<String> {
    Url::parse(&value).with_context(|| format!("{} is not a valid URL: {}", key, value))?;
    Ok(value)
}
