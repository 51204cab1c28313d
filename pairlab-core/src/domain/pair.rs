//! Pair candidates and the outcome of pair selection.

use serde::{Deserialize, Serialize};

/// A candidate pair produced by the cointegration scan.
///
/// Identity is unordered for selection purposes — (A, B) and (B, A) are the
/// same candidate — but the stored order is fixed once the candidate is
/// built, and that order determines the sign of the spread downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairCandidate {
    pub symbol_a: String,
    pub symbol_b: String,
    /// Engle-Granger p-value, in [0, 1].
    pub pvalue: f64,
    /// Pearson correlation of the two price series over their overlap.
    pub correlation: f64,
    /// `-ln(max(pvalue, 1e-8)) * |correlation|`. Only meaningful when
    /// `correlation` is finite and nonzero.
    pub score: f64,
}

impl PairCandidate {
    /// True if this candidate involves `symbol` on either leg.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbol_a == symbol || self.symbol_b == symbol
    }

    /// The leg that is not `symbol`, if `symbol` is one of the legs.
    pub fn partner_of(&self, symbol: &str) -> Option<&str> {
        if self.symbol_a == symbol {
            Some(&self.symbol_b)
        } else if self.symbol_b == symbol {
            Some(&self.symbol_a)
        } else {
            None
        }
    }
}

/// How the winning pair was ranked among candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankBy {
    /// Lowest p-value wins. Cheap proxy used for quick global scans.
    PValue,
    /// Highest `-ln(p) * |corr|` score wins. Used for anchor/subset scans.
    Score,
}

/// Which universe the scan considers and how the winner is constrained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMode {
    /// All symbols, any pair.
    Global,
    /// All symbols, winner must contain the anchor.
    Anchor { anchor: String },
    /// Universe restricted to `symbols`, winner must contain the anchor.
    Subset { symbols: Vec<String>, anchor: String },
}

impl SelectionMode {
    pub fn anchor(&self) -> Option<&str> {
        match self {
            SelectionMode::Global => None,
            SelectionMode::Anchor { anchor } | SelectionMode::Subset { anchor, .. } => {
                Some(anchor)
            }
        }
    }
}

/// Whether the pick is statistically validated or a correlation-only fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMethod {
    /// Winner cleared the Engle-Granger significance threshold (or was the
    /// top-scoring cointegration candidate in the first fallback step).
    Cointegration,
    /// No candidate cleared the threshold; winner is the highest-correlation
    /// partner with a sentinel p-value. Not statistically validated.
    CorrelationFallback,
}

/// The chosen pair. `symbol_a` is the anchor when one was given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSelection {
    pub symbol_a: String,
    pub symbol_b: String,
    pub pvalue: f64,
    pub correlation: Option<f64>,
    pub score: Option<f64>,
    pub method: SelectionMethod,
}
