//! Spread and z-score analytics for a chosen pair.
//!
//! The hedge ratio is a single OLS estimate over the full overlapping
//! window — deliberately not rolling, so a regime change mid-history is not
//! adapted to. Spread and z-score sign follow the pair's fixed (A, B)
//! order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Signal;
use crate::signal::{generate_signals, SignalConfig};
use crate::stats::rolling::{normalize, rolling_corr, rolling_mean, rolling_std};
use crate::stats::{linear_fit, OlsError};

/// Default rolling window, in trading days.
pub const DEFAULT_WINDOW: usize = 20;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("pair has too few overlapping observations ({0})")]
    InsufficientData(usize),

    #[error("hedge-ratio regression is degenerate: {0}")]
    DegenerateRegression(#[from] OlsError),
}

/// Replace non-finite values with 0.
///
/// The hard contract at every serialization boundary: NaN/Inf never cross
/// into JSON or CSV. Callers that need to distinguish "undefined" from
/// "zero" must look at the raw series before sanitizing.
pub fn sanitize(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|v| if v.is_finite() { *v } else { 0.0 })
        .collect()
}

/// Spread/z-score series for one pair. All series are raw: undefined
/// points are NaN until [`sanitize`] is applied at a boundary.
#[derive(Debug, Clone)]
pub struct SpreadAnalytics {
    pub hedge_ratio: f64,
    pub spread: Vec<f64>,
    pub rolling_mean: Vec<f64>,
    pub rolling_std: Vec<f64>,
    pub zscore: Vec<f64>,
    pub rolling_correlation: Vec<f64>,
}

/// Fit the hedge ratio and derive spread, rolling moments, z-score, and the
/// rolling correlation of globally normalized prices.
pub fn compute_spread_analytics(
    prices_a: &[f64],
    prices_b: &[f64],
    window: usize,
) -> Result<SpreadAnalytics, AnalyticsError> {
    let n = prices_a.len().min(prices_b.len());
    if n < 3 {
        return Err(AnalyticsError::InsufficientData(n));
    }
    let (prices_a, prices_b) = (&prices_a[..n], &prices_b[..n]);

    // y = alpha + beta * x; the spread drops alpha on purpose (it is
    // absorbed by the rolling mean).
    let fit = linear_fit(prices_a, prices_b)?;
    let hedge_ratio = fit.beta;

    let spread: Vec<f64> = prices_a
        .iter()
        .zip(prices_b)
        .map(|(a, b)| a - hedge_ratio * b)
        .collect();

    let mean = rolling_mean(&spread, window);
    let std = rolling_std(&spread, window);
    let zscore: Vec<f64> = spread
        .iter()
        .zip(mean.iter().zip(&std))
        .map(|(s, (m, sd))| {
            if *sd > 0.0 {
                (s - m) / sd
            } else {
                f64::NAN
            }
        })
        .collect();

    let norm_a = normalize(prices_a);
    let norm_b = normalize(prices_b);
    let rolling_correlation = rolling_corr(&norm_a, &norm_b, window);

    Ok(SpreadAnalytics {
        hedge_ratio,
        spread,
        rolling_mean: mean,
        rolling_std: std,
        zscore,
        rolling_correlation,
    })
}

/// Sanitized spread analytics plus the signal sequence, ready to cross a
/// serialization boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairAnalytics {
    pub hedge_ratio: f64,
    pub spread: Vec<f64>,
    pub rolling_mean: Vec<f64>,
    pub rolling_std: Vec<f64>,
    pub zscore: Vec<f64>,
    pub rolling_correlation: Vec<f64>,
    pub signals: Vec<Signal>,
}

/// Spread, z-score, and signals in one call.
///
/// Signals are generated from the raw z-score series (an undefined early z
/// must not read as "inside the exit band"); the returned series are
/// sanitized.
pub fn compute_spread_and_signals(
    prices_a: &[f64],
    prices_b: &[f64],
    window: usize,
    signal_config: &SignalConfig,
) -> Result<PairAnalytics, AnalyticsError> {
    let analytics = compute_spread_analytics(prices_a, prices_b, window)?;
    let signals = generate_signals(&analytics.zscore, signal_config);

    Ok(PairAnalytics {
        hedge_ratio: analytics.hedge_ratio,
        spread: sanitize(&analytics.spread),
        rolling_mean: sanitize(&analytics.rolling_mean),
        rolling_std: sanitize(&analytics.rolling_std),
        zscore: sanitize(&analytics.zscore),
        rolling_correlation: sanitize(&analytics.rolling_correlation),
        signals,
    })
}
