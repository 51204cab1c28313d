//! The end-to-end pipeline: one parameterized path from aligned prices to a
//! serializable report.
//!
//! Selection, analytics, signals, advisory, and backtest all run on the raw
//! (NaN-preserving) series; sanitization happens exactly once, while the
//! report is assembled. Signals in particular must never see a sanitized
//! zero where the z-score was undefined.

use thiserror::Error;
use tracing::info;

use pairlab_core::{
    advise, backtest, compute_spread_analytics, generate_signals, sanitize, select_best_pair,
    AnalyticsError, BacktestError, PriceTable, SelectError, Signal,
};

use crate::config::RunConfig;
use crate::report::{DashboardSummary, PairReport, SignalStrength, SCHEMA_VERSION};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Select(#[from] SelectError),

    #[error("selected pair '{0}'/'{1}' has no overlapping data")]
    NoOverlap(String, String),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Backtest(#[from] BacktestError),
}

/// Run the full pipeline over an aligned price table.
pub fn run_pipeline(table: &PriceTable, config: &RunConfig) -> Result<PairReport, PipelineError> {
    let mode = config.mode.to_selection_mode();
    let selection = select_best_pair(table, &mode, config.rank_by)?;
    info!(
        symbol_a = %selection.symbol_a,
        symbol_b = %selection.symbol_b,
        pvalue = selection.pvalue,
        method = ?selection.method,
        "pair selected"
    );

    let overlap = table
        .pair_overlap(&selection.symbol_a, &selection.symbol_b)
        .filter(|o| !o.is_empty())
        .ok_or_else(|| {
            PipelineError::NoOverlap(selection.symbol_a.clone(), selection.symbol_b.clone())
        })?;

    let analytics =
        compute_spread_analytics(&overlap.prices_a, &overlap.prices_b, config.window)?;
    let signals = generate_signals(&analytics.zscore, &config.signal_config());
    let advice = advise(&analytics.zscore, &config.advisory_config());

    let trades = backtest(
        &overlap.prices_a,
        &overlap.prices_b,
        &signals,
        &overlap.dates,
        &selection.symbol_a,
        &selection.symbol_b,
    )?;
    let total_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
    info!(trades = trades.len(), total_pnl, "backtest complete");

    let latest_signal = signals.last().copied().filter(|s| *s != Signal::None);

    Ok(PairReport {
        schema_version: SCHEMA_VERSION,
        mode: config.mode.clone(),
        symbol_a: selection.symbol_a,
        symbol_b: selection.symbol_b,
        pvalue: selection.pvalue,
        correlation: selection.correlation,
        score: selection.score,
        method: selection.method,
        hedge_ratio: analytics.hedge_ratio,
        dates: overlap.dates.iter().map(|d| d.to_string()).collect(),
        prices_a: sanitize(&overlap.prices_a),
        prices_b: sanitize(&overlap.prices_b),
        spread: sanitize(&analytics.spread),
        rolling_mean: sanitize(&analytics.rolling_mean),
        rolling_std: sanitize(&analytics.rolling_std),
        zscore: sanitize(&analytics.zscore),
        rolling_correlation: sanitize(&analytics.rolling_correlation),
        signals,
        latest_signal,
        advice,
        trades,
        total_pnl,
    })
}

/// Condense a report into the dashboard view.
pub fn summarize(report: &PairReport) -> DashboardSummary {
    let signal_strength = if report.latest_signal.is_some() {
        SignalStrength::Strong
    } else {
        SignalStrength::None
    };
    DashboardSummary {
        pair: report.pair_label(),
        method: report.method,
        latest_zscore: report.zscore.last().copied().unwrap_or(0.0),
        latest_signal: report.latest_signal,
        signal_strength,
        advice: report.advice,
        trade_count: report.trades.len(),
        total_pnl: report.total_pnl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModeConfig;
    use crate::loader::synthetic_universe;
    use pairlab_core::SelectionMethod;

    #[test]
    fn report_series_are_aligned_and_finite() {
        let table = synthetic_universe(4, 300, 7);
        let config = RunConfig::default();
        let report = run_pipeline(&table, &config).unwrap();

        let n = report.dates.len();
        assert!(n > 0);
        for series in [
            &report.prices_a,
            &report.prices_b,
            &report.spread,
            &report.rolling_mean,
            &report.rolling_std,
            &report.zscore,
            &report.rolling_correlation,
        ] {
            assert_eq!(series.len(), n);
            assert!(series.iter().all(|v| v.is_finite()));
        }
        assert_eq!(report.signals.len(), n);
        assert!(report.hedge_ratio.is_finite());
    }

    #[test]
    fn anchor_mode_flows_through_to_the_report() {
        let table = synthetic_universe(4, 300, 7);
        let mut config = RunConfig::default();
        config.mode = ModeConfig::Anchor {
            anchor: "SYN02".into(),
        };
        config.rank_by = pairlab_core::RankBy::Score;
        let report = run_pipeline(&table, &config).unwrap();
        assert_eq!(report.symbol_a, "SYN02");
        assert_eq!(report.mode, config.mode);
    }

    #[test]
    fn summary_mirrors_the_report() {
        let table = synthetic_universe(4, 300, 7);
        let report = run_pipeline(&table, &RunConfig::default()).unwrap();
        let summary = summarize(&report);

        assert_eq!(summary.pair, report.pair_label());
        assert_eq!(summary.trade_count, report.trades.len());
        assert_eq!(summary.total_pnl, report.total_pnl);
        assert_eq!(summary.latest_zscore, *report.zscore.last().unwrap());
        match summary.latest_signal {
            Some(_) => assert_eq!(summary.signal_strength, SignalStrength::Strong),
            None => assert_eq!(summary.signal_strength, SignalStrength::None),
        }
    }

    #[test]
    fn cointegrated_universe_selects_by_cointegration() {
        // Even-indexed synthetic symbols share a common walk; the scan
        // should find a significant pair rather than fall back.
        let table = synthetic_universe(6, 400, 11);
        let report = run_pipeline(&table, &RunConfig::default()).unwrap();
        assert_eq!(report.method, SelectionMethod::Cointegration);
        assert!(report.pvalue < 0.05);
    }
}
