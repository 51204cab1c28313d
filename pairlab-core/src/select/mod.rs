//! Pair selection: ranking scanned candidates and the fallback chain.
//!
//! One scoring rule serves every mode: `score = -ln(max(p, 1e-8)) * |corr|`.
//! Candidates whose correlation is zero or undefined have no score and are
//! invisible to score ranking. Callers choose between two ranking
//! strategies: raw lowest p-value (cheap, used for quick global scans) and
//! the combined score (anchor/subset scans).
//!
//! When nothing clears the significance threshold the selector degrades in
//! two explicit steps rather than failing: first the anchor restriction is
//! dropped and the best-scoring candidate overall is taken; if the scan
//! produced no candidates at all, plain Pearson correlation picks a partner
//! and the result is tagged `CorrelationFallback` with a sentinel p-value
//! so callers can tell it apart from a cointegration-backed pick.

use thiserror::Error;
use tracing::{debug, info};

use crate::coint::{find_cointegrated_pairs, CointError, GLOBAL_SIGNIFICANCE, SUBSET_SIGNIFICANCE};
use crate::data::PriceTable;
use crate::domain::{PairCandidate, PairSelection, RankBy, SelectionMethod, SelectionMode};
use crate::stats::pearson;

/// Floor applied to p-values before taking the log, so a p-value of zero
/// cannot produce an infinite score.
pub const PVALUE_FLOOR: f64 = 1e-8;

/// Sentinel p-value attached to correlation-fallback selections.
pub const FALLBACK_PVALUE: f64 = 1.0;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("no cointegrated pair found and the fallback chain is exhausted")]
    NoCointegratedPair,

    #[error(transparent)]
    Coint(#[from] CointError),
}

/// `-ln(max(p, 1e-8)) * |corr|`; NaN when the correlation is unusable.
///
/// Strictly decreasing in the p-value and non-decreasing in |corr|.
pub fn score_pair(pvalue: f64, correlation: f64) -> f64 {
    if !correlation.is_finite() || correlation == 0.0 {
        return f64::NAN;
    }
    -(pvalue.max(PVALUE_FLOOR)).ln() * correlation.abs()
}

fn best_candidate<'a>(
    candidates: impl Iterator<Item = &'a PairCandidate>,
    rank_by: RankBy,
) -> Option<&'a PairCandidate> {
    match rank_by {
        RankBy::PValue => candidates
            .min_by(|a, b| a.pvalue.total_cmp(&b.pvalue)),
        RankBy::Score => candidates
            .filter(|c| c.score.is_finite())
            .max_by(|a, b| a.score.total_cmp(&b.score)),
    }
}

/// Orient a winning candidate: anchor (when given) becomes leg A.
fn orient(candidate: &PairCandidate, anchor: Option<&str>) -> PairSelection {
    let (a, b) = match anchor {
        Some(anchor) if candidate.symbol_b == anchor => {
            (candidate.symbol_b.clone(), candidate.symbol_a.clone())
        }
        _ => (candidate.symbol_a.clone(), candidate.symbol_b.clone()),
    };
    PairSelection {
        symbol_a: a,
        symbol_b: b,
        pvalue: candidate.pvalue,
        correlation: candidate.correlation.is_finite().then_some(candidate.correlation),
        score: candidate.score.is_finite().then_some(candidate.score),
        method: SelectionMethod::Cointegration,
    }
}

/// Select the best pair in the table for the given mode.
///
/// Runs the cointegration scan at the mode's significance level (0.05
/// global/anchor, 0.10 subset) and applies the ranking strategy, then the
/// fallback chain. Every universe of at least two non-degenerate series
/// yields a selection.
pub fn select_best_pair(
    table: &PriceTable,
    mode: &SelectionMode,
    rank_by: RankBy,
) -> Result<PairSelection, SelectError> {
    let (universe, significance) = match mode {
        SelectionMode::Global | SelectionMode::Anchor { .. } => {
            (table.clone(), GLOBAL_SIGNIFICANCE)
        }
        SelectionMode::Subset { symbols, .. } => {
            if symbols.len() < 2 {
                return Err(SelectError::InvalidSelection(format!(
                    "need at least 2 selected symbols, got {}",
                    symbols.len()
                )));
            }
            let subset = table.select(symbols);
            if subset.symbols().len() < 2 {
                return Err(SelectError::InvalidSelection(
                    "fewer than 2 selected symbols exist in the dataset".into(),
                ));
            }
            (subset, SUBSET_SIGNIFICANCE)
        }
    };

    let anchor = mode.anchor();
    if let Some(anchor) = anchor {
        if !universe.contains(anchor) {
            return Err(SelectError::InvalidSelection(format!(
                "anchor '{anchor}' is not in the selected universe"
            )));
        }
    }

    let scan = find_cointegrated_pairs(&universe, significance)?;

    // Primary: candidates satisfying the mode's restriction.
    let restricted: Vec<&PairCandidate> = scan
        .pairs
        .iter()
        .filter(|c| anchor.map_or(true, |a| c.contains(a)))
        .collect();
    if let Some(winner) = best_candidate(restricted.into_iter(), rank_by) {
        debug!(
            symbol_a = %winner.symbol_a,
            symbol_b = %winner.symbol_b,
            pvalue = winner.pvalue,
            "selected cointegrated pair"
        );
        return Ok(orient(winner, anchor));
    }

    // Fallback (a): drop the anchor restriction, take the top-scoring
    // candidate from the same scan.
    if let Some(winner) = best_candidate(scan.pairs.iter(), RankBy::Score) {
        info!(
            symbol_a = %winner.symbol_a,
            symbol_b = %winner.symbol_b,
            "no pair satisfied the restriction; using top-scoring pair"
        );
        return Ok(orient(winner, anchor));
    }

    // Fallback (b): correlation only. Not statistically validated; tagged so
    // callers can tell.
    correlation_fallback(&universe, anchor)
}

fn correlation_fallback(
    universe: &PriceTable,
    anchor: Option<&str>,
) -> Result<PairSelection, SelectError> {
    let symbols = universe.symbols();

    let corr_of = |a: &str, b: &str| -> Option<f64> {
        let overlap = universe.pair_overlap(a, b)?;
        pearson(&overlap.prices_a, &overlap.prices_b)
    };

    let picked = match anchor {
        Some(anchor) => symbols
            .iter()
            .filter(|s| s.as_str() != anchor)
            .filter_map(|s| corr_of(anchor, s).map(|c| (anchor.to_string(), s.clone(), c)))
            // Highest signed correlation against the anchor.
            .max_by(|x, y| x.2.total_cmp(&y.2)),
        None => {
            let mut best: Option<(String, String, f64)> = None;
            for i in 0..symbols.len() {
                for j in (i + 1)..symbols.len() {
                    if let Some(c) = corr_of(&symbols[i], &symbols[j]) {
                        let better = best
                            .as_ref()
                            .map_or(true, |(_, _, b)| c.abs() > b.abs());
                        if better {
                            best = Some((symbols[i].clone(), symbols[j].clone(), c));
                        }
                    }
                }
            }
            best
        }
    };

    let (symbol_a, symbol_b, correlation) =
        picked.ok_or(SelectError::NoCointegratedPair)?;
    info!(%symbol_a, %symbol_b, correlation, "correlation-only fallback selection");

    Ok(PairSelection {
        symbol_a,
        symbol_b,
        pvalue: FALLBACK_PVALUE,
        correlation: Some(correlation),
        score: None,
        method: SelectionMethod::CorrelationFallback,
    })
}
