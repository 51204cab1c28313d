//! JSON-safe pipeline output.
//!
//! Every numeric series in a report has already been through the
//! non-finite→0 sanitization; dates are ISO-8601 strings. This is the hard
//! boundary contract: nothing NaN/Inf may leave the process.

use serde::{Deserialize, Serialize};

use pairlab_core::{Advice, SelectionMethod, Signal, Trade};

use crate::config::ModeConfig;

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Complete result of one pipeline run over one selected pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// The mode the run was configured with.
    pub mode: ModeConfig,

    // ── Selection ──
    pub symbol_a: String,
    pub symbol_b: String,
    pub pvalue: f64,
    pub correlation: Option<f64>,
    pub score: Option<f64>,
    /// Cointegration-backed pick or correlation-only fallback.
    pub method: SelectionMethod,

    // ── Analytics (aligned to `dates`, sanitized) ──
    pub hedge_ratio: f64,
    pub dates: Vec<String>,
    pub prices_a: Vec<f64>,
    pub prices_b: Vec<f64>,
    pub spread: Vec<f64>,
    pub rolling_mean: Vec<f64>,
    pub rolling_std: Vec<f64>,
    pub zscore: Vec<f64>,
    pub rolling_correlation: Vec<f64>,

    // ── Signals ──
    pub signals: Vec<Signal>,
    pub latest_signal: Option<Signal>,
    /// Display-only advisory label; independent of `signals`.
    pub advice: Advice,

    // ── Backtest ──
    pub trades: Vec<Trade>,
    pub total_pnl: f64,
}

impl PairReport {
    pub fn pair_label(&self) -> String {
        format!("{} - {}", self.symbol_a, self.symbol_b)
    }
}

/// Strength label attached to the latest signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStrength {
    Strong,
    None,
}

/// Condensed dashboard view of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub pair: String,
    pub method: SelectionMethod,
    pub latest_zscore: f64,
    pub latest_signal: Option<Signal>,
    pub signal_strength: SignalStrength,
    pub advice: Advice,
    pub trade_count: usize,
    pub total_pnl: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn older_schema_field_defaults() {
        // A report persisted before schema_version existed still loads.
        let json = r#"{
            "mode": {"type": "GLOBAL"},
            "symbol_a": "AAA", "symbol_b": "BBB",
            "pvalue": 0.01, "correlation": 0.9, "score": 4.1,
            "method": "COINTEGRATION",
            "hedge_ratio": 0.5,
            "dates": [], "prices_a": [], "prices_b": [],
            "spread": [], "rolling_mean": [], "rolling_std": [],
            "zscore": [], "rolling_correlation": [],
            "signals": [], "latest_signal": null, "advice": "HOLD",
            "trades": [], "total_pnl": 0.0
        }"#;
        let report: PairReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.pair_label(), "AAA - BBB");
    }
}
