//! Rolling-window statistics with expanding-start semantics.
//!
//! Every function here uses "min_periods = 1" behavior: the first
//! `window - 1` outputs are computed over the shorter prefix that is
//! available instead of being left undefined. Early values are noisier,
//! but every date gets a value. Statistics that need at least two
//! observations (std, correlation) stay NaN until two are present.

use super::{mean, pearson, sample_std};

fn window_start(i: usize, window: usize) -> usize {
    (i + 1).saturating_sub(window)
}

/// Rolling mean over finite values in the trailing window.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "window must be >= 1");
    (0..values.len())
        .map(|i| {
            let slice: Vec<f64> = values[window_start(i, window)..=i]
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            mean(&slice)
        })
        .collect()
}

/// Rolling sample standard deviation (ddof = 1) over the trailing window.
///
/// NaN while fewer than two finite observations are in the window.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "window must be >= 1");
    (0..values.len())
        .map(|i| {
            let slice: Vec<f64> = values[window_start(i, window)..=i]
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            sample_std(&slice)
        })
        .collect()
}

/// Rolling Pearson correlation of two series over the trailing window.
///
/// Dates where either side is non-finite are excluded from the window.
/// NaN while fewer than two paired observations exist or a side has zero
/// variance inside the window.
pub fn rolling_corr(a: &[f64], b: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "window must be >= 1");
    let n = a.len().min(b.len());
    (0..n)
        .map(|i| {
            let start = window_start(i, window);
            let mut xs = Vec::with_capacity(i + 1 - start);
            let mut ys = Vec::with_capacity(i + 1 - start);
            for k in start..=i {
                if a[k].is_finite() && b[k].is_finite() {
                    xs.push(a[k]);
                    ys.push(b[k]);
                }
            }
            pearson(&xs, &ys).unwrap_or(f64::NAN)
        })
        .collect()
}

/// Standardize a series by its own global mean and sample std.
///
/// All-NaN output when the series has zero variance.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let m = mean(&finite);
    let s = sample_std(&finite);
    values.iter().map(|v| (v - m) / s).collect()
}
