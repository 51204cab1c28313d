//! Price data loading.
//!
//! The expected layout is a directory of per-symbol CSV exports. The symbol
//! name comes from the file name with the exchange-export noise stripped:
//! `Quote-Equity-INFY-EQ-....csv` → `INFY`. Files without usable date/close
//! columns are skipped with a warning rather than failing the whole load;
//! the load fails only when nothing usable remains.

use std::fs::File;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{info, warn};

use pairlab_core::data::read_price_csv;
use pairlab_core::{PricePoint, PriceSeries, PriceTable};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read data directory '{dir}': {source}")]
    Io {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no usable price CSVs in '{0}'")]
    NoData(PathBuf),
}

/// Derive a symbol name from an export file name.
///
/// Strips a `Quote-Equity-` prefix and anything from `-EQ` on, then
/// uppercases. A plain `INFY.csv` therefore maps to `INFY` unchanged.
fn symbol_from_file_name(name: &str) -> String {
    let base = name.strip_suffix(".csv").unwrap_or(name);
    let base = base.strip_prefix("Quote-Equity-").unwrap_or(base);
    let base = match base.find("-EQ") {
        Some(idx) => &base[..idx],
        None => base,
    };
    base.to_uppercase()
}

/// Load every price CSV in a directory into an aligned, forward-filled
/// table.
pub fn load_price_dir(dir: &Path) -> Result<PriceTable, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut series = Vec::new();
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    // Deterministic load order regardless of directory iteration order.
    paths.sort();

    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let symbol = symbol_from_file_name(name);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(err) => {
                warn!(%symbol, path = %path.display(), %err, "skipping unreadable file");
                continue;
            }
        };
        match read_price_csv(&symbol, file) {
            Ok(s) => {
                info!(%symbol, rows = s.len(), "loaded price series");
                series.push(s);
            }
            Err(err) => {
                warn!(%symbol, path = %path.display(), %err, "skipping file");
            }
        }
    }

    if series.is_empty() {
        return Err(LoadError::NoData(dir.to_path_buf()));
    }
    Ok(PriceTable::from_series(series))
}

/// Deterministic synthetic universe: `symbols` series over `days` days,
/// even-indexed symbols cointegrated with a common random walk, odd-indexed
/// symbols independent walks. Used by tests and the CLI demo mode; results
/// on synthetic data are labeled as such by the caller.
pub fn synthetic_universe(symbols: usize, days: usize, seed: u64) -> PriceTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let base_date = chrono::NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();

    let mut base = vec![100.0_f64];
    for _ in 1..days {
        let step: f64 = rng.gen_range(-0.5..0.5);
        base.push(base.last().unwrap() + step);
    }

    let mut series = Vec::with_capacity(symbols);
    for s in 0..symbols {
        let closes: Vec<f64> = if s % 2 == 0 {
            let beta = 0.3 + 0.15 * (s as f64 + 1.0);
            base.iter()
                .map(|v| beta * v + 4.0 + rng.gen_range(-0.4..0.4))
                .collect()
        } else {
            let mut walk = vec![60.0 + 5.0 * s as f64];
            for _ in 1..days {
                let step: f64 = rng.gen_range(-0.5..0.5);
                walk.push(walk.last().unwrap() + step);
            }
            walk
        };
        series.push(PriceSeries::new(
            format!("SYN{s:02}"),
            closes
                .iter()
                .enumerate()
                .map(|(i, close)| PricePoint {
                    date: base_date + chrono::Duration::days(i as i64),
                    close: *close,
                })
                .collect(),
        ));
    }
    PriceTable::from_series(series)
}
