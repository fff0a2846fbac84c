use tracing::warn;

use crate::store::action::AppAction;
use crate::store::state::AppState;

pub const DEFAULT_LIVE_EVENT_CAPACITY: usize = 100;

/// Pure transition function: `(state, action) -> state`. Never fails, never
/// performs I/O, never mutates its input.
#[derive(Debug, Clone, Copy)]
pub struct Reducer {
    live_event_capacity: usize,
}

impl Default for Reducer {
    fn default() -> Self {
        Self::new(DEFAULT_LIVE_EVENT_CAPACITY)
    }
}

impl Reducer {
    /// A capacity of 0 would drop every event, so it falls back to the default.
    pub fn new(live_event_capacity: usize) -> Self {
        let live_event_capacity = if live_event_capacity == 0 {
            warn!(
                "live event capacity of 0 requested, using default of {}",
                DEFAULT_LIVE_EVENT_CAPACITY
            );
            DEFAULT_LIVE_EVENT_CAPACITY
        } else {
            live_event_capacity
        };

        Self { live_event_capacity }
    }

    pub fn live_event_capacity(&self) -> usize {
        self.live_event_capacity
    }

    pub fn reduce(&self, state: &AppState, action: AppAction) -> AppState {
        let mut next = state.clone();

        match action {
            AppAction::SetCurrentSeason(season) => {
                next.current_season = Some(season);
            }
            AppAction::SetVaults(vaults) => {
                next.vaults = vaults;
            }
            AppAction::SetSelectedVault(vault) => {
                next.selected_vault = vault;
            }
            AppAction::SetTimeRange(range) => {
                next.time_range = range;
            }
            AppAction::SetLoading(loading) => {
                next.is_loading = loading;
            }
            AppAction::AddLiveEvent(event) => {
                next.live_events.insert(0, event);
                next.live_events.truncate(self.live_event_capacity);
            }
            AppAction::SetLiveEvents(events) => {
                next.live_events = events;
            }
            AppAction::UpdateVault { vault_id, updates } => {
                for vault in next.vaults.iter_mut().filter(|v| v.id == vault_id) {
                    *vault = vault.merged(&updates);
                }
                if let Some(selected) = next.selected_vault.as_mut() {
                    if selected.id == vault_id {
                        *selected = selected.merged(&updates);
                    }
                }
            }
            AppAction::SetMarketData(market_data) => {
                next.market_data = market_data;
            }
        }

        next
    }
}
