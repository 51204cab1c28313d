//! Multi-symbol date alignment.
//!
//! Symbols are aligned to the union of all dates and forward-filled: a date
//! a symbol never traded inherits the last known close. Leading dates
//! before a symbol's first observation stay NaN; per-pair work intersects
//! those away.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::domain::PriceSeries;

/// Date-indexed table of aligned, forward-filled closing prices.
#[derive(Debug, Clone)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: HashMap<String, Vec<f64>>,
}

impl PriceTable {
    /// Align a set of per-symbol series to their common (union) timeline and
    /// forward-fill interior gaps.
    pub fn from_series(series: Vec<PriceSeries>) -> Self {
        let mut all_dates: BTreeSet<NaiveDate> = BTreeSet::new();
        for s in &series {
            all_dates.extend(s.dates());
        }
        let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

        let mut symbols = Vec::with_capacity(series.len());
        let mut columns = HashMap::with_capacity(series.len());
        for s in series {
            let by_date: HashMap<NaiveDate, f64> =
                s.points().iter().map(|p| (p.date, p.close)).collect();

            let mut column = Vec::with_capacity(dates.len());
            let mut last = f64::NAN;
            for date in &dates {
                if let Some(close) = by_date.get(date) {
                    if close.is_finite() {
                        last = *close;
                    }
                }
                column.push(last);
            }
            symbols.push(s.symbol.clone());
            columns.insert(s.symbol, column);
        }
        symbols.sort();

        Self {
            dates,
            symbols,
            columns,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Symbols in the table, sorted. Pair iteration order (and therefore
    /// scan determinism) follows this ordering.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, symbol: &str) -> Option<&[f64]> {
        self.columns.get(symbol).map(|c| c.as_slice())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.columns.contains_key(symbol)
    }

    /// Restrict the table to the given symbols. Unknown symbols are dropped;
    /// the caller validates the remaining universe size.
    pub fn select(&self, wanted: &[String]) -> PriceTable {
        let mut symbols: Vec<String> = wanted
            .iter()
            .filter(|s| self.columns.contains_key(*s))
            .cloned()
            .collect();
        symbols.sort();
        symbols.dedup();
        let columns = symbols
            .iter()
            .map(|s| (s.clone(), self.columns[s].clone()))
            .collect();
        PriceTable {
            dates: self.dates.clone(),
            symbols,
            columns,
        }
    }

    /// Rows where both symbols have a finite price, in date order.
    pub fn pair_overlap(&self, a: &str, b: &str) -> Option<PairOverlap> {
        let col_a = self.column(a)?;
        let col_b = self.column(b)?;

        let mut dates = Vec::new();
        let mut prices_a = Vec::new();
        let mut prices_b = Vec::new();
        for (i, date) in self.dates.iter().enumerate() {
            if col_a[i].is_finite() && col_b[i].is_finite() {
                dates.push(*date);
                prices_a.push(col_a[i]);
                prices_b.push(col_b[i]);
            }
        }

        Some(PairOverlap {
            dates,
            prices_a,
            prices_b,
        })
    }
}

/// The shared-date view of one pair: equal-length price vectors.
#[derive(Debug, Clone)]
pub struct PairOverlap {
    pub dates: Vec<NaiveDate>,
    pub prices_a: Vec<f64>,
    pub prices_b: Vec<f64>,
}

impl PairOverlap {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
