use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::chain::PriceSource;
use crate::error::{ArenaError, Result};
use crate::models::MarketData;

#[derive(Debug, Deserialize)]
struct PriceApiResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<PriceApiEntry>,
}

#[derive(Debug, Deserialize)]
struct PriceApiEntry {
    symbol: String,
    price: f64,
    #[serde(default, alias = "change24h", alias = "priceChange24h")]
    change_24h: Option<f64>,
    #[serde(
        default,
        alias = "percent_change_24h",
        alias = "change24hPercentage",
        alias = "priceChangePercentage24h"
    )]
    change_24h_percentage: Option<f64>,
    #[serde(default, alias = "volume24h", alias = "volume")]
    volume_24h: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct CachedPrice {
    price: f64,
    fetched_at: DateTime<Utc>,
}

/// Client for the token price API, caching prices per symbol.
pub struct PriceApiClient {
    client: Client,
    api_url: String,
    cache: DashMap<String, CachedPrice>,
    cache_ttl: Duration,
    fallback_btc_price: f64,
}

impl PriceApiClient {
    pub fn new(
        api_url: impl Into<String>,
        cache_ttl: Duration,
        fallback_btc_price: f64,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            cache: DashMap::new(),
            cache_ttl,
            fallback_btc_price,
        })
    }

    /// Cached price for a symbol, if still within the TTL.
    pub fn cached_price(&self, symbol: &str) -> Option<f64> {
        let entry = self.cache.get(symbol)?;
        is_fresh(entry.fetched_at, Utc::now(), self.cache_ttl).then_some(entry.price)
    }

    fn remember(&self, market: &[MarketData]) {
        for item in market {
            self.cache.insert(
                item.symbol.clone(),
                CachedPrice {
                    price: item.price,
                    fetched_at: item.timestamp,
                },
            );
        }
    }
}

fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(fetched_at)
        .to_std()
        .map(|age| age < ttl)
        .unwrap_or(true)
}

fn into_market_data(response: PriceApiResponse, now: DateTime<Utc>) -> Result<Vec<MarketData>> {
    if !response.success {
        return Err(ArenaError::Upstream {
            status: 200,
            message: "price API returned an unsuccessful response".to_string(),
        });
    }

    Ok(response
        .data
        .into_iter()
        .map(|entry| MarketData {
            symbol: entry.symbol.to_ascii_uppercase(),
            price: entry.price,
            change24h: entry.change_24h.unwrap_or(0.0),
            change24h_percentage: entry.change_24h_percentage.unwrap_or(0.0),
            volume24h: entry.volume_24h.unwrap_or(0.0),
            timestamp: now,
        })
        .collect())
}

#[async_trait]
impl PriceSource for PriceApiClient {
    async fn prices(&self) -> Result<Vec<MarketData>> {
        let response = self.client.get(&self.api_url).send().await?;

        if !response.status().is_success() {
            return Err(ArenaError::Upstream {
                status: response.status().as_u16(),
                message: "price API request failed".to_string(),
            });
        }

        let body: PriceApiResponse = response.json().await?;
        let market = into_market_data(body, Utc::now())?;
        self.remember(&market);

        debug!("Fetched {} prices", market.len());
        Ok(market)
    }

    async fn btc_price(&self) -> f64 {
        if let Some(price) = self.cached_price("BTC") {
            return price;
        }

        match self.prices().await {
            Ok(market) => match market.iter().find(|m| m.symbol == "BTC") {
                Some(btc) => {
                    info!("Fetched BTC price: ${:.2}", btc.price);
                    btc.price
                }
                None => {
                    warn!("BTC missing from price API response, using fallback");
                    self.fallback_btc_price
                }
            },
            Err(e) => {
                warn!("Error fetching BTC price, using fallback: {}", e);
                self.fallback_btc_price
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_price_api_payload() {
        let body: PriceApiResponse = serde_json::from_str(
            r#"{
                "success": true,
                "count": 2,
                "data": [
                    { "symbol": "BTC", "price": 97000.5, "percent_change_24h": 1.5, "volume_24h": 1000 },
                    { "symbol": "eth", "price": 3500 }
                ]
            }"#,
        )
        .unwrap();

        let market = into_market_data(body, Utc::now()).unwrap();
        assert_eq!(market.len(), 2);
        assert_eq!(market[0].symbol, "BTC");
        assert_eq!(market[0].change24h_percentage, 1.5);
        assert_eq!(market[0].volume24h, 1000.0);
        assert_eq!(market[1].symbol, "ETH");
        assert_eq!(market[1].change24h, 0.0);
    }

    #[test]
    fn unsuccessful_payload_is_an_error() {
        let body: PriceApiResponse = serde_json::from_str(r#"{ "success": false }"#).unwrap();
        assert!(into_market_data(body, Utc::now()).is_err());
    }

    #[test]
    fn freshness_respects_ttl() {
        let now = Utc::now();
        let ttl = Duration::from_secs(600);
        assert!(is_fresh(now - chrono::Duration::seconds(30), now, ttl));
        assert!(!is_fresh(now - chrono::Duration::minutes(11), now, ttl));
    }

    #[tokio::test]
    async fn falls_back_when_api_is_unreachable() {
        let client = PriceApiClient::new(
            "http://127.0.0.1:9/prices",
            Duration::from_secs(600),
            95_000.0,
            Duration::from_millis(200),
        )
        .unwrap();

        assert_eq!(client.btc_price().await, 95_000.0);
        assert!(client.cached_price("BTC").is_none());
    }

    #[test]
    fn cache_serves_fresh_prices() {
        let client = PriceApiClient::new(
            "http://127.0.0.1:9/prices",
            Duration::from_secs(600),
            95_000.0,
            Duration::from_millis(200),
        )
        .unwrap();

        client.remember(&[MarketData {
            symbol: "BTC".to_string(),
            price: 101_000.0,
            change24h: 0.0,
            change24h_percentage: 0.0,
            volume24h: 0.0,
            timestamp: Utc::now(),
        }]);
        assert_eq!(client.cached_price("BTC"), Some(101_000.0));
    }
}
