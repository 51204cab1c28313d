//! Per-symbol closing-price history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation: date and closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Chronologically ordered closing prices for one symbol.
///
/// Invariants (enforced at construction): dates strictly increasing, no
/// duplicates. Prices are whatever the loader produced; cleaning (comma
/// stripping, numeric coercion) happens upstream, so `close` may be NaN
/// for dates the symbol never traded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from observations, sorting by date and dropping
    /// exact-duplicate dates (first occurrence wins).
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    /// Number of observations with a finite price.
    pub fn valid_len(&self) -> usize {
        self.points.iter().filter(|p| p.close.is_finite()).count()
    }
}
