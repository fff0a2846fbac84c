//! # Store Module
//!
//! Centralized, reducer-driven application state.
//!
//! ## Concurrency
//! Every dispatch runs "read state, reduce, install" inside one `parking_lot`
//! mutex section, so two dispatches are always applied as two sequential
//! transitions. The reducer never awaits and never does I/O; anything async
//! resolves first and dispatches the result afterwards.
//!
//! ## Subscriptions
//! Callbacks registered with [`AppStore::subscribe`] run after each dispatch with
//! the new snapshot, outside the state lock, so a callback may dispatch again.
//! A subscriber removed while a notification is in flight may still receive it.

pub mod action;
pub mod reducer;
pub mod state;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::models::{LiveEvent, MarketData, Season, Vault, VaultPatch};

pub use action::AppAction;
pub use reducer::{DEFAULT_LIVE_EVENT_CAPACITY, Reducer};
pub use state::{AppState, TimeRange};

pub type SubscriptionId = u64;

type Subscriber = Arc<dyn Fn(&AppState) + Send + Sync>;

/// Store tuning.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Upper bound of the live event feed.
    pub live_event_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            live_event_capacity: DEFAULT_LIVE_EVENT_CAPACITY,
        }
    }
}

/// Single source of truth for cross-cutting dashboard state.
pub struct AppStore {
    state: Mutex<AppState>,
    reducer: Reducer,
    subscribers: DashMap<SubscriptionId, Subscriber>,
    next_subscription: AtomicU64,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("reducer", &self.reducer)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl AppStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            state: Mutex::new(AppState::default()),
            reducer: Reducer::new(config.live_event_capacity),
            subscribers: DashMap::new(),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Apply one transition and return the snapshot it produced.
    pub fn dispatch(&self, action: AppAction) -> AppState {
        let name = action.name();

        let next = {
            let mut guard = self.state.lock();
            let next = self.reducer.reduce(&guard, action);
            *guard = next.clone();
            next
        };

        debug!(
            action = name,
            vaults = next.vaults.len(),
            live_events = next.live_events.len(),
            "dispatched"
        );

        self.notify(&next);
        next
    }

    /// Current snapshot.
    pub fn state(&self) -> AppState {
        self.state.lock().clone()
    }

    /// Read a projection of the state without cloning all of it.
    pub fn select<T>(&self, selector: impl FnOnce(&AppState) -> T) -> T {
        selector(&self.state.lock())
    }

    pub fn live_event_capacity(&self) -> usize {
        self.reducer.live_event_capacity()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, Arc::new(callback));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    fn notify(&self, state: &AppState) {
        // Snapshot the callbacks first so none runs while a shard lock is held.
        let callbacks: Vec<Subscriber> = self
            .subscribers
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for callback in callbacks {
            callback(state);
        }
    }

    pub fn set_current_season(&self, season: Season) -> AppState {
        self.dispatch(AppAction::SetCurrentSeason(season))
    }

    pub fn set_vaults(&self, vaults: Vec<Vault>) -> AppState {
        self.dispatch(AppAction::SetVaults(vaults))
    }

    pub fn set_selected_vault(&self, vault: Option<Vault>) -> AppState {
        self.dispatch(AppAction::SetSelectedVault(vault))
    }

    /// Select a vault by id, resolving it against the current vault list.
    /// Returns `None` (and changes nothing) when the id is unknown.
    pub fn select_vault_by_id(&self, vault_id: &str) -> Option<AppState> {
        let vault = self.select(|state| state.vault(vault_id).cloned())?;
        Some(self.dispatch(AppAction::SetSelectedVault(Some(vault))))
    }

    pub fn set_time_range(&self, range: TimeRange) -> AppState {
        self.dispatch(AppAction::SetTimeRange(range))
    }

    pub fn set_loading(&self, loading: bool) -> AppState {
        self.dispatch(AppAction::SetLoading(loading))
    }

    pub fn add_live_event(&self, event: LiveEvent) -> AppState {
        self.dispatch(AppAction::AddLiveEvent(event))
    }

    pub fn set_live_events(&self, events: Vec<LiveEvent>) -> AppState {
        self.dispatch(AppAction::SetLiveEvents(events))
    }

    pub fn update_vault(&self, vault_id: impl Into<String>, updates: VaultPatch) -> AppState {
        self.dispatch(AppAction::UpdateVault {
            vault_id: vault_id.into(),
            updates,
        })
    }

    pub fn set_market_data(&self, market_data: Vec<MarketData>) -> AppState {
        self.dispatch(AppAction::SetMarketData(market_data))
    }
}
