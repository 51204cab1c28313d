//! Ordinary least squares via the normal equations.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OlsError {
    #[error("regression needs at least {needed} observations, got {got}")]
    TooFewObservations { needed: usize, got: usize },

    #[error("regressor matrix is rank-deficient (singular normal equations)")]
    Singular,
}

/// A fitted multi-regressor OLS model.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub beta: DVector<f64>,
    pub residuals: DVector<f64>,
    pub ssr: f64,
    pub nobs: usize,
    pub nparams: usize,
    xtx_inv: DMatrix<f64>,
}

impl OlsFit {
    /// t-statistic of coefficient `i` (beta / standard error).
    pub fn t_stat(&self, i: usize) -> f64 {
        let dof = self.nobs.saturating_sub(self.nparams);
        if dof == 0 {
            return f64::NAN;
        }
        let mse = self.ssr / dof as f64;
        let se = (mse * self.xtx_inv[(i, i)]).sqrt();
        self.beta[i] / se
    }

    /// Akaike information criterion up to an additive constant in `nobs`.
    ///
    /// Candidate lag models in the ADF auto-lag search share one sample, so
    /// the constant terms cancel in the argmin.
    pub fn aic(&self) -> f64 {
        let n = self.nobs as f64;
        n * (self.ssr / n).ln() + 2.0 * self.nparams as f64
    }
}

/// Fit `y = X·β` by OLS. `x` is the full design matrix (including any
/// constant column the caller wants).
pub fn ols(y: &DVector<f64>, x: &DMatrix<f64>) -> Result<OlsFit, OlsError> {
    let nobs = x.nrows();
    let nparams = x.ncols();
    if nobs <= nparams {
        return Err(OlsError::TooFewObservations {
            needed: nparams + 1,
            got: nobs,
        });
    }

    let xtx = x.transpose() * x;
    let xty = x.transpose() * y;
    let xtx_inv = xtx.try_inverse().ok_or(OlsError::Singular)?;
    let beta = &xtx_inv * xty;

    let fitted = x * &beta;
    let residuals = y - fitted;
    let ssr = residuals.dot(&residuals);
    if !ssr.is_finite() {
        return Err(OlsError::Singular);
    }

    Ok(OlsFit {
        beta,
        residuals,
        ssr,
        nobs,
        nparams,
        xtx_inv,
    })
}

/// Simple linear regression `y = alpha + beta·x`.
#[derive(Debug, Clone)]
pub struct LinearFit {
    pub alpha: f64,
    pub beta: f64,
    pub residuals: Vec<f64>,
}

/// Fit `y = alpha + beta·x`. Fails when `x` is constant (rank-deficient
/// design) rather than returning a zero slope.
pub fn linear_fit(y: &[f64], x: &[f64]) -> Result<LinearFit, OlsError> {
    let n = y.len().min(x.len());
    if n < 3 {
        return Err(OlsError::TooFewObservations { needed: 3, got: n });
    }

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] });
    let yv = DVector::from_iterator(n, y[..n].iter().copied());
    let fit = ols(&yv, &design)?;

    Ok(LinearFit {
        alpha: fit.beta[0],
        beta: fit.beta[1],
        residuals: fit.residuals.iter().copied().collect(),
    })
}
