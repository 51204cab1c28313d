//! MacKinnon (1994) approximate asymptotic p-values for the Engle-Granger
//! cointegration tau statistic.
//!
//! Only the surface actually used by the pipeline is carried: two variables,
//! constant-only deterministic trend in the cointegrating regression. The
//! p-value is Phi(poly(tau)) with separate polynomials for the small-p and
//! large-p regions, switching at `TAU_STAR`, clamped to 0/1 outside the
//! tabulated range.

use statrs::distribution::{ContinuousCDF, Normal};

/// Region boundary between the small-p cubic-free fit and the large-p fit.
const TAU_STAR: f64 = -2.62;
/// Below this statistic the p-value underflows the table: report 0.
const TAU_MIN: f64 = -18.86;
/// Above this statistic the p-value saturates: report 1.
const TAU_MAX: f64 = 0.92;

/// Small-p polynomial (quadratic): p = Phi(c0 + c1*tau + c2*tau^2).
const SMALL_P: [f64; 3] = [2.92, 1.5012, 3.9796e-2];
/// Large-p polynomial (cubic): p = Phi(d0 + d1*tau + d2*tau^2 + d3*tau^3).
const LARGE_P: [f64; 4] = [2.1945, 6.4695e-1, -2.9198e-1, -4.2377e-2];

/// Approximate p-value for an Engle-Granger tau statistic (2 variables,
/// constant trend).
pub fn mackinnon_pvalue(tau: f64) -> f64 {
    if tau.is_nan() {
        return f64::NAN;
    }
    if tau <= TAU_MIN {
        return 0.0;
    }
    if tau >= TAU_MAX {
        return 1.0;
    }

    let z = if tau <= TAU_STAR {
        SMALL_P[0] + SMALL_P[1] * tau + SMALL_P[2] * tau * tau
    } else {
        LARGE_P[0] + LARGE_P[1] * tau + LARGE_P[2] * tau * tau + LARGE_P[3] * tau * tau * tau
    };

    let normal = Normal::new(0.0, 1.0).expect("unit normal is valid");
    normal.cdf(z)
}
