//! JSON and CSV artifact export.
//!
//! Persisted reports carry a `schema_version` field; versions newer than
//! this build are rejected on load instead of being half-parsed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use pairlab_core::{PositionState, Trade};

use crate::report::{PairReport, SCHEMA_VERSION};

/// Serialize a `PairReport` to pretty JSON.
pub fn export_json(report: &PairReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize PairReport to JSON")
}

/// Deserialize a `PairReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<PairReport> {
    let report: PairReport =
        serde_json::from_str(json).context("failed to deserialize PairReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

/// Export a trade list as CSV.
///
/// Columns: symbol_a, symbol_b, direction, bought, sold, entry_date,
/// entry_price_a, entry_price_b, exit_date, exit_price_a, exit_price_b,
/// days_held, pnl
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "symbol_a",
        "symbol_b",
        "direction",
        "bought",
        "sold",
        "entry_date",
        "entry_price_a",
        "entry_price_b",
        "exit_date",
        "exit_price_a",
        "exit_price_b",
        "days_held",
        "pnl",
    ])?;

    for t in trades {
        let direction = match t.direction {
            PositionState::LongSpread => "LONG_SPREAD",
            PositionState::ShortSpread => "SHORT_SPREAD",
            PositionState::Flat => "FLAT",
        };
        wtr.write_record([
            t.symbol_a.as_str(),
            t.symbol_b.as_str(),
            direction,
            t.bought(),
            t.sold(),
            &t.entry_date.to_string(),
            &format!("{:.4}", t.entry_price_a),
            &format!("{:.4}", t.entry_price_b),
            &t.exit_date.to_string(),
            &format!("{:.4}", t.exit_price_a),
            &format!("{:.4}", t.exit_price_b),
            &t.days_held().to_string(),
            &format!("{:.4}", t.pnl),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Save the artifact pair for one run: `report.json` and `trades.csv` under
/// a timestamped directory. Returns the created directory.
pub fn save_artifacts(report: &PairReport, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}_{}",
        report.symbol_a,
        report.symbol_b,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("report.json"), export_json(report)?)?;
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(&report.trades)?)?;

    Ok(run_dir)
}

/// Load a `PairReport` from an artifact directory's report.json.
pub fn load_artifacts(dir: &Path) -> Result<PairReport> {
    let report_path = dir.join("report.json");
    let json = std::fs::read_to_string(&report_path)
        .with_context(|| format!("failed to read {}", report_path.display()))?;
    import_json(&json)
}
