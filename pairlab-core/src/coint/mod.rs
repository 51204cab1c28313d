//! Pairwise Engle-Granger cointegration scan.
//!
//! For every unordered symbol pair the scan drops per-pair missing dates,
//! runs the two-step Engle-Granger test, and records the p-value in a
//! symmetric matrix. Pairs below the caller's significance threshold become
//! candidates. A pair whose test fails numerically is logged and skipped;
//! its matrix cells keep the 1.0 default and it simply never appears in the
//! candidate list.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::data::PriceTable;
use crate::domain::PairCandidate;
use crate::select::score_pair;
use crate::stats::{adf_tstat, linear_fit, mackinnon_pvalue, pearson, AdfError, OlsError};

/// Default significance for full-universe scans.
pub const GLOBAL_SIGNIFICANCE: f64 = 0.05;
/// Looser default for restricted/subset scans, compensating for the smaller
/// candidate set.
pub const SUBSET_SIGNIFICANCE: f64 = 0.10;

#[derive(Debug, Error)]
pub enum CointError {
    #[error("need at least 2 symbols with overlapping data, got {0}")]
    InsufficientData(usize),
}

/// Why a single pair's test was skipped. Never aborts the scan.
#[derive(Debug, Error)]
pub enum PairTestError {
    #[error("cointegrating regression failed: {0}")]
    Regression(#[from] OlsError),

    #[error("residual unit-root test failed: {0}")]
    UnitRoot(#[from] AdfError),

    #[error("test statistic was not finite")]
    NonFinite,
}

/// Engle-Granger two-step test: OLS of `y` on `x` with intercept, then an
/// ADF regression on the residuals. Returns the MacKinnon p-value.
pub fn engle_granger_pvalue(y: &[f64], x: &[f64]) -> Result<f64, PairTestError> {
    let first_stage = linear_fit(y, x)?;
    let tau = adf_tstat(&first_stage.residuals)?;
    let pvalue = mackinnon_pvalue(tau);
    if !pvalue.is_finite() {
        return Err(PairTestError::NonFinite);
    }
    Ok(pvalue)
}

/// Symmetric p-value matrix over a symbol universe.
///
/// Diagonal and never-computed cells hold 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PvalueMatrixRepr")]
pub struct PvalueMatrix {
    symbols: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    values: Vec<f64>,
}

/// Wire form of [`PvalueMatrix`]; the symbol index is derived state and is
/// rebuilt on deserialization.
#[derive(Deserialize)]
struct PvalueMatrixRepr {
    symbols: Vec<String>,
    values: Vec<f64>,
}

impl From<PvalueMatrixRepr> for PvalueMatrix {
    fn from(repr: PvalueMatrixRepr) -> Self {
        let index = repr
            .symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Self {
            symbols: repr.symbols,
            index,
            values: repr.values,
        }
    }
}

impl PvalueMatrix {
    fn new(symbols: Vec<String>) -> Self {
        let n = symbols.len();
        let index = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Self {
            symbols,
            index,
            values: vec![1.0; n * n],
        }
    }

    fn set(&mut self, i: usize, j: usize, pvalue: f64) {
        let n = self.symbols.len();
        self.values[i * n + j] = pvalue;
        self.values[j * n + i] = pvalue;
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = *self.index.get(a)?;
        let j = *self.index.get(b)?;
        Some(self.values[i * self.symbols.len() + j])
    }
}

/// Result of a universe scan: candidates below significance plus the full
/// matrix.
#[derive(Debug, Clone)]
pub struct CointScan {
    pub pairs: Vec<PairCandidate>,
    pub matrix: PvalueMatrix,
}

/// Test every unordered pair in the table.
///
/// Candidates come back in (i, j) discovery order over the sorted symbol
/// list, so the scan is deterministic for a given table.
pub fn find_cointegrated_pairs(
    table: &PriceTable,
    significance: f64,
) -> Result<CointScan, CointError> {
    let symbols = table.symbols();
    if symbols.len() < 2 {
        return Err(CointError::InsufficientData(symbols.len()));
    }

    let index_pairs: Vec<(usize, usize)> = (0..symbols.len())
        .flat_map(|i| ((i + 1)..symbols.len()).map(move |j| (i, j)))
        .collect();

    // Each test is independent; the scan is the only O(N^2) step.
    let results: Vec<(usize, usize, bool, Option<(f64, f64)>)> = index_pairs
        .par_iter()
        .map(|&(i, j)| {
            let a = &symbols[i];
            let b = &symbols[j];
            let overlap = match table.pair_overlap(a, b) {
                Some(o) if !o.is_empty() => o,
                _ => return (i, j, false, None),
            };
            match engle_granger_pvalue(&overlap.prices_a, &overlap.prices_b) {
                Ok(pvalue) => {
                    let corr = pearson(&overlap.prices_a, &overlap.prices_b);
                    (i, j, true, Some((pvalue, corr.unwrap_or(f64::NAN))))
                }
                Err(err) => {
                    warn!(symbol_a = %a, symbol_b = %b, %err, "skipping pair");
                    (i, j, true, None)
                }
            }
        })
        .collect();

    let mut matrix = PvalueMatrix::new(symbols.to_vec());
    let mut pairs = Vec::new();
    let mut overlapping = std::collections::HashSet::new();
    for (i, j, has_overlap, outcome) in results {
        if has_overlap {
            overlapping.insert(i);
            overlapping.insert(j);
        }
        let Some((pvalue, correlation)) = outcome else {
            continue;
        };
        matrix.set(i, j, pvalue);
        if pvalue < significance {
            pairs.push(PairCandidate {
                symbol_a: symbols[i].clone(),
                symbol_b: symbols[j].clone(),
                pvalue,
                correlation,
                score: score_pair(pvalue, correlation),
            });
        }
    }

    if overlapping.len() < 2 {
        return Err(CointError::InsufficientData(overlapping.len()));
    }

    Ok(CointScan { pairs, matrix })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PricePoint, PriceSeries};
    use chrono::NaiveDate;

    fn table_from(columns: &[(&str, Vec<f64>)]) -> PriceTable {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let series = columns
            .iter()
            .map(|(symbol, closes)| {
                PriceSeries::new(
                    *symbol,
                    closes
                        .iter()
                        .enumerate()
                        .map(|(i, close)| PricePoint {
                            date: start + chrono::Days::new(i as u64),
                            close: *close,
                        })
                        .collect(),
                )
            })
            .collect();
        PriceTable::from_series(series)
    }

    fn noise(i: usize, salt: f64) -> f64 {
        let x = ((i as f64 + salt) * 12.9898).sin() * 43758.5453;
        x.fract().abs() - 0.5
    }

    /// A driftless walk and a copy of it plus stationary noise: textbook
    /// cointegrated pair.
    fn cointegrated_universe(n: usize) -> (Vec<f64>, Vec<f64>) {
        let mut base = vec![100.0_f64];
        for i in 1..n {
            base.push(base[i - 1] + noise(i, 1.0));
        }
        let partner: Vec<f64> = base
            .iter()
            .enumerate()
            .map(|(i, v)| 0.5 * v + 3.0 + 0.2 * noise(i, 7.0))
            .collect();
        (base, partner)
    }

    #[test]
    fn cointegrated_pair_is_found() {
        let (a, b) = cointegrated_universe(250);
        let table = table_from(&[("AAA", a), ("BBB", b)]);
        let scan = find_cointegrated_pairs(&table, GLOBAL_SIGNIFICANCE).unwrap();
        assert_eq!(scan.pairs.len(), 1);
        let candidate = &scan.pairs[0];
        assert!(candidate.pvalue < 0.05);
        assert!(candidate.score > 0.0);
    }

    #[test]
    fn independent_walks_are_not_candidates() {
        let mut a = vec![100.0_f64];
        let mut b = vec![50.0_f64];
        for i in 1..250 {
            a.push(a[i - 1] + noise(i, 1.0));
            b.push(b[i - 1] + noise(i, 1000.0));
        }
        let table = table_from(&[("AAA", a), ("BBB", b)]);
        // Test at the 1% level: independent walks should stay well away
        // from strong-evidence territory.
        let scan = find_cointegrated_pairs(&table, 0.01).unwrap();
        assert!(scan.pairs.is_empty());
        // Matrix still records the p-value symmetrically.
        let p = scan.matrix.get("AAA", "BBB").unwrap();
        assert!(p > 0.01, "p = {p}");
        assert_eq!(scan.matrix.get("BBB", "AAA").unwrap(), p);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let (a, b) = cointegrated_universe(200);
        let c: Vec<f64> = (0..200).map(|i| 40.0 + 10.0 * noise(i, 31.0)).collect();
        let table = table_from(&[("AAA", a), ("BBB", b), ("CCC", c)]);
        let scan = find_cointegrated_pairs(&table, GLOBAL_SIGNIFICANCE).unwrap();
        for x in scan.matrix.symbols() {
            assert_eq!(scan.matrix.get(x, x).unwrap(), 1.0);
            for y in scan.matrix.symbols() {
                assert_eq!(scan.matrix.get(x, y), scan.matrix.get(y, x));
            }
        }
    }

    #[test]
    fn failing_pair_is_skipped_not_fatal() {
        // CCC is constant: its first-stage regression is rank-deficient, so
        // both CCC pairs fail and only AAA/BBB remains testable.
        let (a, b) = cointegrated_universe(200);
        let table = table_from(&[("AAA", a), ("BBB", b), ("CCC", vec![5.0; 200])]);
        let scan = find_cointegrated_pairs(&table, GLOBAL_SIGNIFICANCE).unwrap();
        assert!(scan.pairs.iter().all(|p| !p.contains("CCC")));
        assert_eq!(scan.matrix.get("AAA", "CCC").unwrap(), 1.0);
    }

    #[test]
    fn matrix_lookup_survives_serialization() {
        let (a, b) = cointegrated_universe(200);
        let table = table_from(&[("AAA", a), ("BBB", b)]);
        let scan = find_cointegrated_pairs(&table, GLOBAL_SIGNIFICANCE).unwrap();

        let json = serde_json::to_string(&scan.matrix).unwrap();
        let restored: PvalueMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.symbols(), scan.matrix.symbols());
        // The symbol index is rebuilt, so lookups keep working.
        assert_eq!(
            restored.get("AAA", "BBB"),
            scan.matrix.get("AAA", "BBB")
        );
        assert_eq!(restored.get("BBB", "BBB").unwrap(), 1.0);
    }

    #[test]
    fn single_symbol_is_insufficient() {
        let table = table_from(&[("AAA", vec![1.0, 2.0, 3.0])]);
        assert!(matches!(
            find_cointegrated_pairs(&table, 0.05),
            Err(CointError::InsufficientData(1))
        ));
    }
}
