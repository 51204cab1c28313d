//! Trade — a closed round-trip on a pair.

use super::signal::PositionState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A completed round-trip: entry on an ENTER signal, exit on an EXIT signal.
///
/// Only closed trades exist; a position still open at the end of the series
/// is dropped by the backtester and never becomes a `Trade`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub symbol_a: String,
    pub symbol_b: String,
    /// Direction held between entry and exit (never `Flat`).
    pub direction: PositionState,

    pub entry_date: NaiveDate,
    pub entry_price_a: f64,
    pub entry_price_b: f64,

    pub exit_date: NaiveDate,
    pub exit_price_a: f64,
    pub exit_price_b: f64,

    /// Realized one-unit-per-leg P&L.
    pub pnl: f64,
}

impl Trade {
    /// The leg bought at entry.
    pub fn bought(&self) -> &str {
        match self.direction {
            PositionState::ShortSpread => &self.symbol_b,
            _ => &self.symbol_a,
        }
    }

    /// The leg sold at entry.
    pub fn sold(&self) -> &str {
        match self.direction {
            PositionState::ShortSpread => &self.symbol_a,
            _ => &self.symbol_b,
        }
    }

    pub fn days_held(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}
