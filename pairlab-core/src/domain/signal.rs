//! Discrete trade signals and position state.

use serde::{Deserialize, Serialize};

/// Per-date signal emitted by the z-score state machine.
///
/// "Long spread" means long leg A / short leg B; "short spread" the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    EnterLongSpread,
    EnterShortSpread,
    Exit,
    None,
}

impl Signal {
    pub fn is_entry(&self) -> bool {
        matches!(self, Signal::EnterLongSpread | Signal::EnterShortSpread)
    }
}

/// Position carried by the state machine and the backtester.
///
/// Exactly one position can be open at a time; there is no pyramiding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionState {
    Flat,
    /// Long leg A, short leg B.
    LongSpread,
    /// Short leg A, long leg B.
    ShortSpread,
}

impl PositionState {
    pub fn is_open(&self) -> bool {
        !matches!(self, PositionState::Flat)
    }
}

/// Display-only recommendation from the last-5 z-score average.
///
/// Deliberately separate from the entry/exit state machine: different
/// thresholds (±1.2 vs ±2.0/0.5), different input (trailing mean vs the
/// current z-score), and never fed to the backtester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Advice {
    /// Sell leg A, buy leg B.
    SellABuyB,
    /// Buy leg A, sell leg B.
    BuyASellB,
    Hold,
}
