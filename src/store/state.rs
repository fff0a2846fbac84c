use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{LiveEvent, MarketData, Season, Vault};

/// Window the performance charts are drawn over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1H")]
    OneHour,
    #[default]
    #[serde(rename = "24H")]
    OneDay,
    #[serde(rename = "7D")]
    SevenDays,
    #[serde(rename = "30D")]
    ThirtyDays,
    #[serde(rename = "ALL")]
    All,
}

impl TimeRange {
    pub const ALL_RANGES: [TimeRange; 5] = [
        TimeRange::OneHour,
        TimeRange::OneDay,
        TimeRange::SevenDays,
        TimeRange::ThirtyDays,
        TimeRange::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneHour => "1H",
            TimeRange::OneDay => "24H",
            TimeRange::SevenDays => "7D",
            TimeRange::ThirtyDays => "30D",
            TimeRange::All => "ALL",
        }
    }

    /// Number of chart samples drawn for this range. `ALL` is capped at 30 days.
    pub fn sample_count(&self) -> usize {
        match self {
            TimeRange::OneHour => 12,
            TimeRange::OneDay => 24,
            TimeRange::SevenDays => 7 * 24,
            TimeRange::ThirtyDays | TimeRange::All => 30 * 24,
        }
    }

    pub fn sample_spacing(&self) -> Duration {
        match self {
            TimeRange::OneHour => Duration::minutes(5),
            _ => Duration::hours(1),
        }
    }

    /// Span covered by the chart samples.
    pub fn chart_window(&self) -> Duration {
        self.sample_spacing() * self.sample_count() as i32
    }

    /// Oldest instant that falls inside this range. `ALL` has no lower bound.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeRange::All => None,
            _ => Some(now - self.chart_window()),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL_RANGES
            .into_iter()
            .find(|range| range.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown time range: {}", s))
    }
}

/// Snapshot of everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub current_season: Option<Season>,
    pub vaults: Vec<Vault>,
    /// Newest first.
    pub live_events: Vec<LiveEvent>,
    pub market_data: Vec<MarketData>,
    pub is_loading: bool,
    pub selected_vault: Option<Vault>,
    pub time_range: TimeRange,
}

impl AppState {
    pub fn vault(&self, vault_id: &str) -> Option<&Vault> {
        self.vaults.iter().find(|vault| vault.id == vault_id)
    }
}
