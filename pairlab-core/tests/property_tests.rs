//! Property tests for pipeline invariants.
//!
//! 1. No pyramiding — the state machine never emits a second ENTER without
//!    an intervening EXIT, for any z-score sequence (including NaN).
//! 2. Score monotonicity — decreasing in p-value, non-decreasing in |corr|.
//! 3. Backtest pairing — every trade closes an earlier entry; trades never
//!    outnumber ENTER signals; exits never precede entries.

use chrono::NaiveDate;
use proptest::prelude::*;

use pairlab_core::{backtest, generate_signals, select, Signal, SignalConfig};

fn arb_zscore() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -4.0..4.0_f64,
        1 => Just(f64::NAN),
        1 => -50.0..50.0_f64,
    ]
}

fn arb_zscores() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_zscore(), 0..200)
}

proptest! {
    /// Between any two ENTER signals there is an EXIT, for any input.
    #[test]
    fn no_pyramiding(zscores in arb_zscores()) {
        let signals = generate_signals(&zscores, &SignalConfig::default());
        let mut open = false;
        for signal in &signals {
            match signal {
                Signal::EnterLongSpread | Signal::EnterShortSpread => {
                    prop_assert!(!open, "ENTER while a position was open");
                    open = true;
                }
                Signal::Exit => {
                    prop_assert!(open, "EXIT while flat");
                    open = false;
                }
                Signal::None => {}
            }
        }
    }

    /// Signals and backtest agree: the trade count equals the number of
    /// completed ENTER/EXIT cycles, and every trade is chronologically sane.
    #[test]
    fn trades_match_signal_cycles(zscores in arb_zscores()) {
        let signals = generate_signals(&zscores, &SignalConfig::default());
        let n = signals.len();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..n).map(|i| start + chrono::Days::new(i as u64)).collect();
        let prices_a: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        let prices_b: Vec<f64> = (0..n).map(|i| 50.0 + (i as f64) * 0.5).collect();

        let trades = backtest(&prices_a, &prices_b, &signals, &dates, "A", "B").unwrap();

        let exits = signals.iter().filter(|s| **s == Signal::Exit).count();
        prop_assert_eq!(trades.len(), exits);
        for trade in &trades {
            prop_assert!(trade.exit_date > trade.entry_date);
        }
    }

    /// Score is strictly decreasing in the p-value above the floor.
    #[test]
    fn score_decreasing_in_pvalue(
        p1 in 1e-7..1.0_f64,
        bump in 1e-6..0.5_f64,
        corr in 0.05..1.0_f64,
    ) {
        let p2 = (p1 + bump).min(1.0);
        prop_assume!(p2 > p1);
        prop_assert!(select::score_pair(p1, corr) > select::score_pair(p2, corr));
    }

    /// Score is non-decreasing in |correlation| and sign-blind.
    #[test]
    fn score_increasing_in_correlation(
        p in 1e-7..1.0_f64,
        c1 in 0.01..1.0_f64,
        c2 in 0.01..1.0_f64,
    ) {
        let (lo, hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
        prop_assert!(select::score_pair(p, lo) <= select::score_pair(p, hi));
        prop_assert_eq!(select::score_pair(p, -hi), select::score_pair(p, hi));
    }
}
