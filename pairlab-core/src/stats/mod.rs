//! Statistical primitives: OLS, rolling windows, ADF, MacKinnon p-values.

pub mod adf;
pub mod mackinnon;
pub mod ols;
pub mod rolling;

pub use adf::{adf_tstat, AdfError};
pub use mackinnon::mackinnon_pvalue;
pub use ols::{linear_fit, LinearFit, OlsError, OlsFit};

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1). NaN for fewer than 2 values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Pearson correlation over paired observations.
///
/// Returns `None` when fewer than 2 points remain or either series has
/// zero variance.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let ma = mean(a);
    let mb = mean(b);
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for i in 0..n {
        let da = a[i] - ma;
        let db = b[i] - mb;
        cov += da * db;
        va += da * da;
        vb += db * db;
    }
    if va == 0.0 || vb == 0.0 {
        return None;
    }
    let r = cov / (va.sqrt() * vb.sqrt());
    r.is_finite().then_some(r)
}
