use crate::models::{LiveEvent, MarketData, Season, Vault, VaultPatch};
use crate::store::state::TimeRange;

/// Every transition the store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SetCurrentSeason(Season),
    SetVaults(Vec<Vault>),
    SetSelectedVault(Option<Vault>),
    SetTimeRange(TimeRange),
    SetLoading(bool),
    AddLiveEvent(LiveEvent),
    SetLiveEvents(Vec<LiveEvent>),
    UpdateVault { vault_id: String, updates: VaultPatch },
    SetMarketData(Vec<MarketData>),
}

impl AppAction {
    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            AppAction::SetCurrentSeason(_) => "SET_CURRENT_SEASON",
            AppAction::SetVaults(_) => "SET_VAULTS",
            AppAction::SetSelectedVault(_) => "SET_SELECTED_VAULT",
            AppAction::SetTimeRange(_) => "SET_TIME_RANGE",
            AppAction::SetLoading(_) => "SET_LOADING",
            AppAction::AddLiveEvent(_) => "ADD_LIVE_EVENT",
            AppAction::SetLiveEvents(_) => "SET_LIVE_EVENTS",
            AppAction::UpdateVault { .. } => "UPDATE_VAULT",
            AppAction::SetMarketData(_) => "SET_MARKET_DATA",
        }
    }
}
