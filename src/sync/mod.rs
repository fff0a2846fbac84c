//! # Sync Module
//!
//! Keeps the store in step with the chain. Each tick fetches market prices and
//! the season manager object, parses the newest season and dispatches the
//! results. All I/O happens here; the store only ever sees resolved values.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::{Instant, interval};
use tracing::{debug, error, info, warn};

use crate::adapter::{SeasonSnapshot, derive_live_events, parse_seasons, seed_live_events};
use crate::chain::{ChainReader, PriceSource};
use crate::error::Result;
use crate::models::MarketData;
use crate::store::AppStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    pub phase: SyncPhase,
    pub ticks: u64,
    pub failures: u64,
    pub events_emitted: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// What a single successful tick changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub season_number: Option<u64>,
    pub vaults: usize,
    pub events: usize,
}

/// Periodic season synchronizer feeding an [`AppStore`].
pub struct SeasonSync {
    store: Arc<AppStore>,
    chain: Arc<dyn ChainReader>,
    prices: Arc<dyn PriceSource>,
    season_object_id: String,
    interval: Duration,
    phase: Arc<RwLock<SyncPhase>>,
    stats: Arc<RwLock<SyncStats>>,
}

impl SeasonSync {
    pub fn new(
        store: Arc<AppStore>,
        chain: Arc<dyn ChainReader>,
        prices: Arc<dyn PriceSource>,
        season_object_id: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            chain,
            prices,
            season_object_id: season_object_id.into(),
            interval,
            phase: Arc::new(RwLock::new(SyncPhase::Idle)),
            stats: Arc::new(RwLock::new(SyncStats {
                phase: SyncPhase::Idle,
                ticks: 0,
                failures: 0,
                events_emitted: 0,
                last_success: None,
                last_error: None,
            })),
        }
    }

    /// Run the sync loop until [`stop`](Self::stop) is called. Returns
    /// immediately if the loop is already running or was stopped.
    pub async fn start(&self) {
        {
            let mut phase = self.phase.write().await;
            if *phase != SyncPhase::Idle {
                return;
            }
            *phase = SyncPhase::Running;
        }

        info!(
            "Starting season sync for {} every {:?}",
            self.season_object_id, self.interval
        );

        let mut ticker = interval(self.interval);

        while *self.phase.read().await == SyncPhase::Running {
            ticker.tick().await;
            if self.is_stopped().await {
                break;
            }

            let started = Instant::now();
            match self.sync_once().await {
                Ok(outcome) => debug!(
                    "Synced season {:?}: {} vaults, {} new events in {:?}",
                    outcome.season_number,
                    outcome.vaults,
                    outcome.events,
                    started.elapsed()
                ),
                Err(e) => error!("Season sync failed: {}", e),
            }
        }

        info!("Season sync stopped");
    }

    /// Stop the loop. Nothing is dispatched by this synchronizer afterwards,
    /// apart from clearing a loading flag left by an interrupted tick.
    pub async fn stop(&self) {
        *self.phase.write().await = SyncPhase::Stopped;
        if self.store.select(|s| s.is_loading) {
            self.store.set_loading(false);
        }
        info!("Season sync stop signal sent");
    }

    pub async fn stats(&self) -> SyncStats {
        let mut stats = self.stats.read().await.clone();
        stats.phase = *self.phase.read().await;
        stats
    }

    async fn is_stopped(&self) -> bool {
        *self.phase.read().await == SyncPhase::Stopped
    }

    /// Fetch, parse and dispatch once. Failures leave the previous snapshot in
    /// place.
    pub async fn sync_once(&self) -> Result<SyncOutcome> {
        {
            let phase = self.phase.read().await;
            if *phase == SyncPhase::Stopped {
                return Ok(SyncOutcome::default());
            }
            self.store.set_loading(true);
        }

        let (market, object) = futures::join!(
            self.prices.prices(),
            self.chain.get_object(&self.season_object_id)
        );

        let btc_price = match market.as_ref().ok().and_then(|market| btc_from(market)) {
            Some(price) => price,
            None => self.prices.btc_price().await,
        };
        let parsed = object.and_then(|object| parse_seasons(&object, btc_price));

        // Held until every dispatch of this tick is done, so `stop` cannot
        // slip in between the check and the writes.
        let phase = self.phase.read().await;
        if *phase == SyncPhase::Stopped {
            debug!("Season sync stopped mid-tick, discarding results");
            return Ok(SyncOutcome::default());
        }

        match market {
            Ok(market) => {
                self.store.set_market_data(market);
            }
            Err(e) => warn!("Keeping previous market data: {}", e),
        }

        let result = parsed.map(|seasons| self.apply(seasons));
        self.store.set_loading(false);
        drop(phase);

        let mut stats = self.stats.write().await;
        stats.ticks += 1;
        match &result {
            Ok(outcome) => {
                stats.events_emitted += outcome.events as u64;
                stats.last_success = Some(Utc::now());
                stats.last_error = None;
            }
            Err(e) => {
                stats.failures += 1;
                stats.last_error = Some(e.to_string());
            }
        }

        result
    }

    fn apply(&self, seasons: Vec<SeasonSnapshot>) -> SyncOutcome {
        let Some(newest) = seasons.into_iter().next() else {
            warn!("Season object {} holds no seasons", self.season_object_id);
            return SyncOutcome::default();
        };

        let season_number = newest.season.season_number;
        let vaults = newest.vaults;
        let previous = self.store.select(|s| s.vaults.clone());

        self.store.set_current_season(newest.season);
        self.store.set_vaults(vaults.clone());

        let events = if previous.is_empty() {
            let seeded = seed_live_events(&vaults, self.store.live_event_capacity());
            let count = seeded.len();
            self.store.set_live_events(seeded);
            count
        } else {
            let derived = derive_live_events(&previous, &vaults, Utc::now());
            let count = derived.len();
            for event in derived {
                self.store.add_live_event(event);
            }
            count
        };

        if let Some(selected) = self.store.select(|s| s.selected_vault.clone()) {
            match vaults.iter().find(|v| v.id == selected.id) {
                Some(fresh) => {
                    self.store.set_selected_vault(Some(fresh.clone()));
                }
                None => {
                    info!("Selected vault {} left the season, clearing selection", selected.id);
                    self.store.set_selected_vault(None);
                }
            }
        }

        SyncOutcome {
            season_number: Some(season_number),
            vaults: vaults.len(),
            events,
        }
    }
}

fn btc_from(market: &[MarketData]) -> Option<f64> {
    market
        .iter()
        .find(|m| m.symbol == "BTC")
        .map(|m| m.price)
        .filter(|p| *p > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::season::fixtures::season_object;
    use crate::error::ArenaError;
    use crate::store::StoreConfig;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;

    struct StubChain {
        object: Mutex<Option<Value>>,
    }

    impl StubChain {
        fn with(object: Value) -> Self {
            Self {
                object: Mutex::new(Some(object)),
            }
        }

        fn replace(&self, object: Option<Value>) {
            *self.object.lock() = object;
        }
    }

    #[async_trait]
    impl ChainReader for StubChain {
        async fn get_object(&self, object_id: &str) -> Result<Value> {
            self.object
                .lock()
                .clone()
                .ok_or_else(|| ArenaError::ObjectNotFound(object_id.to_string()))
        }

        async fn get_balance(&self, _owner: &str, _coin_type: &str) -> Result<u128> {
            Ok(0)
        }

        async fn get_owned_objects(&self, _owner: &str, _struct_type: &str) -> Result<Vec<Value>> {
            Ok(Vec::new())
        }
    }

    struct StubPrices;

    #[async_trait]
    impl PriceSource for StubPrices {
        async fn prices(&self) -> Result<Vec<MarketData>> {
            Ok(vec![MarketData {
                symbol: "BTC".to_string(),
                price: 100_000.0,
                change24h: 0.0,
                change24h_percentage: 0.0,
                volume24h: 0.0,
                timestamp: Utc::now(),
            }])
        }

        async fn btc_price(&self) -> f64 {
            100_000.0
        }
    }

    /// Price source whose API is down and whose fallback lookup is slow.
    struct SlowFallbackPrices;

    #[async_trait]
    impl PriceSource for SlowFallbackPrices {
        async fn prices(&self) -> Result<Vec<MarketData>> {
            Err(ArenaError::Upstream {
                status: 503,
                message: "price API down".to_string(),
            })
        }

        async fn btc_price(&self) -> f64 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            100_000.0
        }
    }

    fn sync_with(chain: Arc<StubChain>) -> (Arc<AppStore>, SeasonSync) {
        let store = Arc::new(AppStore::new(StoreConfig::default()));
        let sync = SeasonSync::new(
            store.clone(),
            chain,
            Arc::new(StubPrices),
            "0xseason",
            Duration::from_millis(10),
        );
        (store, sync)
    }

    #[tokio::test]
    async fn first_tick_populates_store_and_seeds_feed() {
        let (store, sync) = sync_with(Arc::new(StubChain::with(season_object(3))));

        let outcome = sync.sync_once().await.unwrap();
        assert_eq!(outcome.season_number, Some(1));
        assert_eq!(outcome.vaults, 2);
        assert_eq!(outcome.events, 3);

        let state = store.state();
        assert!(!state.is_loading);
        assert_eq!(state.current_season.as_ref().map(|s| s.season_number), Some(1));
        assert_eq!(state.vaults.len(), 2);
        assert_eq!(state.live_events.len(), 3);
        assert_eq!(state.market_data.len(), 1);
    }

    #[tokio::test]
    async fn later_ticks_append_only_new_trades() {
        let chain = Arc::new(StubChain::with(season_object(1)));
        let (store, sync) = sync_with(chain.clone());
        sync.sync_once().await.unwrap();
        assert_eq!(store.state().live_events.len(), 1);

        chain.replace(Some(season_object(3)));
        let outcome = sync.sync_once().await.unwrap();
        assert_eq!(outcome.events, 2);

        let events = store.state().live_events;
        assert_eq!(events.len(), 3);
        assert!(events[0].timestamp >= events[1].timestamp);
    }

    #[tokio::test]
    async fn selection_follows_fresh_vault_data() {
        let chain = Arc::new(StubChain::with(season_object(1)));
        let (store, sync) = sync_with(chain.clone());
        sync.sync_once().await.unwrap();

        assert!(store.select_vault_by_id("s1-claude").is_some());
        chain.replace(Some(season_object(3)));
        sync.sync_once().await.unwrap();

        let state = store.state();
        let selected = state.selected_vault.as_ref().unwrap();
        assert_eq!(selected.trades.len(), 3);
        assert_eq!(Some(selected), state.vault("s1-claude"));
    }

    #[tokio::test]
    async fn failure_keeps_previous_snapshot() {
        let chain = Arc::new(StubChain::with(season_object(2)));
        let (store, sync) = sync_with(chain.clone());
        sync.sync_once().await.unwrap();
        let before = store.state();

        chain.replace(None);
        assert!(sync.sync_once().await.is_err());

        let after = store.state();
        assert_eq!(after.vaults, before.vaults);
        assert_eq!(after.current_season, before.current_season);
        assert!(!after.is_loading);

        let stats = sync.stats().await;
        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.failures, 1);
        assert!(stats.last_error.is_some());
    }

    #[tokio::test]
    async fn nothing_is_dispatched_after_stop() {
        let (store, sync) = sync_with(Arc::new(StubChain::with(season_object(2))));
        let dispatches = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = dispatches.clone();
        store.subscribe(move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });

        sync.stop().await;
        let outcome = sync.sync_once().await.unwrap();

        assert_eq!(outcome, SyncOutcome::default());
        assert_eq!(dispatches.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert!(store.state().vaults.is_empty());
        assert_eq!(sync.stats().await.phase, SyncPhase::Stopped);
    }

    #[tokio::test]
    async fn stop_during_price_fallback_discards_the_tick() {
        let store = Arc::new(AppStore::new(StoreConfig::default()));
        let sync = Arc::new(SeasonSync::new(
            store.clone(),
            Arc::new(StubChain::with(season_object(2))),
            Arc::new(SlowFallbackPrices),
            "0xseason",
            Duration::from_millis(10),
        ));

        let runner = sync.clone();
        let tick = tokio::spawn(async move { runner.sync_once().await });

        tokio::time::sleep(Duration::from_millis(30)).await;
        sync.stop().await;

        let dispatches = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = dispatches.clone();
        store.subscribe(move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });

        let outcome = tick.await.unwrap().unwrap();
        assert_eq!(outcome, SyncOutcome::default());
        assert_eq!(dispatches.load(std::sync::atomic::Ordering::SeqCst), 0);

        let state = store.state();
        assert!(state.vaults.is_empty());
        assert!(state.current_season.is_none());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn selection_is_replaced_even_when_fields_disappear() {
        let (store, sync) = sync_with(Arc::new(StubChain::with(season_object(1))));

        let mut stale = crate::models::vault::sample_vault("s1-claude");
        stale.personality = Some(crate::models::AiPersonality {
            name: "Claude".to_string(),
            description: "patient trend follower".to_string(),
            risk_tolerance: crate::models::RiskTolerance::Moderate,
            typical_trade_size: 500.0,
            trade_frequency: crate::models::TradeFrequency::Medium,
            confidence_range: (60.0, 90.0),
            reasoning_style: "technical".to_string(),
        });
        store.set_vaults(vec![stale]);
        store.select_vault_by_id("s1-claude").unwrap();

        sync.sync_once().await.unwrap();

        let state = store.state();
        let selected = state.selected_vault.as_ref().unwrap();
        assert!(selected.personality.is_none());
        assert_eq!(Some(selected), state.vault("s1-claude"));
    }

    #[tokio::test]
    async fn loop_runs_until_stopped() {
        let (store, sync) = sync_with(Arc::new(StubChain::with(season_object(1))));
        let sync = Arc::new(sync);

        let runner = sync.clone();
        let handle = tokio::spawn(async move { runner.start().await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        sync.stop().await;
        handle.await.unwrap();

        assert_eq!(store.state().vaults.len(), 2);
        assert!(sync.stats().await.ticks >= 1);
    }
}
