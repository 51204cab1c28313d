//! Augmented Dickey-Fuller regression for cointegration residuals.
//!
//! Matches the second step of the Engle-Granger procedure: the residuals of
//! the cointegrating regression already have the constant removed, so the
//! ADF regression carries no deterministic terms. Lag order is chosen by
//! AIC over a common sample, then the statistic is re-estimated at the
//! chosen lag on the longest available sample.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use super::ols::{ols, OlsError};

#[derive(Debug, Error)]
pub enum AdfError {
    #[error("series too short for ADF regression ({0} observations)")]
    TooShort(usize),

    #[error("ADF regression failed: {0}")]
    Regression(#[from] OlsError),

    #[error("degenerate ADF regression (no residual variance)")]
    Degenerate,
}

/// Schwert's rule of thumb for the largest lag to consider.
fn default_maxlag(nobs: usize) -> usize {
    let by_rule = (12.0 * (nobs as f64 / 100.0).powf(0.25)).ceil() as usize;
    by_rule.min(nobs / 2 - 1)
}

/// Dependent vector and design matrix for the ADF regression at `lag`
/// trailing difference terms.
///
/// Row `r` regresses `diff[lag + r]` on the lagged level and the `lag`
/// most recent differences. Column 0 is the lagged level; its t-statistic
/// is the ADF statistic.
fn build_regression(
    series: &[f64],
    diff: &[f64],
    lag: usize,
) -> (DVector<f64>, DMatrix<f64>) {
    let rows = diff.len() - lag;
    let cols = 1 + lag;
    let y = DVector::from_fn(rows, |r, _| diff[lag + r]);
    let x = DMatrix::from_fn(rows, cols, |r, c| {
        if c == 0 {
            series[lag + r]
        } else {
            diff[lag + r - c]
        }
    });
    (y, x)
}

/// t-statistic of the lagged level in the ADF regression (no deterministic
/// terms), with AIC automatic lag selection.
pub fn adf_tstat(series: &[f64]) -> Result<f64, AdfError> {
    let n = series.len();
    if n < 8 || n / 2 < 2 {
        return Err(AdfError::TooShort(n));
    }

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let maxlag = default_maxlag(n);
    if diff.len() <= maxlag + 2 {
        return Err(AdfError::TooShort(n));
    }

    // Lag selection on the common sample trimmed for the largest candidate,
    // so every candidate sees the same observations.
    let (y_full, x_full) = build_regression(series, &diff, maxlag);
    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=maxlag {
        let x_sub = x_full.columns(0, 1 + lag).into_owned();
        let fit = match ols(&y_full, &x_sub) {
            Ok(fit) => fit,
            Err(_) => continue,
        };
        let aic = fit.aic();
        if best.map_or(true, |(b, _)| aic < b) {
            best = Some((aic, lag));
        }
    }
    let (_, bestlag) = best.ok_or(AdfError::Regression(OlsError::Singular))?;

    // Final estimate at the chosen lag over the longest sample it allows.
    let (y, x) = build_regression(series, &diff, bestlag);
    let fit = ols(&y, &x)?;
    let t = fit.t_stat(0);
    if !t.is_finite() {
        return Err(AdfError::Degenerate);
    }
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-noise in [-0.5, 0.5); keeps the tests free of a
    /// seeded RNG while still looking rough.
    fn noise(i: usize) -> f64 {
        let x = ((i as f64 + 1.0) * 12.9898).sin() * 43758.5453;
        x.fract().abs() - 0.5
    }

    #[test]
    fn mean_reverting_series_strongly_rejects_unit_root() {
        // AR(1) with phi = 0.2: stationary, statistic should be deeply negative.
        let mut s = vec![0.0_f64];
        for i in 1..300 {
            let prev = s[i - 1];
            s.push(0.2 * prev + noise(i));
        }
        let t = adf_tstat(&s).unwrap();
        assert!(t < -5.0, "t = {t}");
    }

    #[test]
    fn random_walk_does_not_reject() {
        let mut s = vec![0.0_f64];
        for i in 1..300 {
            s.push(s[i - 1] + noise(i));
        }
        let t = adf_tstat(&s).unwrap();
        assert!(t > -3.0, "t = {t}");
    }

    #[test]
    fn constant_series_is_degenerate() {
        let s = vec![1.0; 50];
        assert!(adf_tstat(&s).is_err());
    }

    #[test]
    fn short_series_rejected() {
        let s = [1.0, 2.0, 1.5, 2.5, 1.0];
        assert!(matches!(adf_tstat(&s), Err(AdfError::TooShort(_))));
    }
}
