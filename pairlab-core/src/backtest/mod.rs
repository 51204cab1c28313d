//! Signal replay into closed trades.
//!
//! One-unit-per-leg bookkeeping: an ENTER records both legs' prices, the
//! matching EXIT realizes the P&L and appends a [`Trade`]. At most one
//! position is open at any time. Redundant signals (ENTER while open, EXIT
//! while flat) are ignored, not errors. A position still open at the final
//! date is dropped without a trade record — unrealized P&L is out of
//! scope, a known limitation rather than an oversight.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{PositionState, Signal, Trade};

#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("input lengths differ: {prices_a} prices A, {prices_b} prices B, {signals} signals, {dates} dates")]
    LengthMismatch {
        prices_a: usize,
        prices_b: usize,
        signals: usize,
        dates: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct OpenPosition {
    direction: PositionState,
    entry_date: NaiveDate,
    entry_price_a: f64,
    entry_price_b: f64,
}

/// Replay (priceA, priceB, signal, date) tuples in order and collect the
/// closed trades.
pub fn backtest(
    prices_a: &[f64],
    prices_b: &[f64],
    signals: &[Signal],
    dates: &[NaiveDate],
    symbol_a: &str,
    symbol_b: &str,
) -> Result<Vec<Trade>, BacktestError> {
    let n = signals.len();
    if prices_a.len() != n || prices_b.len() != n || dates.len() != n {
        return Err(BacktestError::LengthMismatch {
            prices_a: prices_a.len(),
            prices_b: prices_b.len(),
            signals: n,
            dates: dates.len(),
        });
    }

    let mut trades = Vec::new();
    let mut open: Option<OpenPosition> = None;

    for i in 0..n {
        match (signals[i], open) {
            (Signal::EnterLongSpread, None) => {
                open = Some(OpenPosition {
                    direction: PositionState::LongSpread,
                    entry_date: dates[i],
                    entry_price_a: prices_a[i],
                    entry_price_b: prices_b[i],
                });
            }
            (Signal::EnterShortSpread, None) => {
                open = Some(OpenPosition {
                    direction: PositionState::ShortSpread,
                    entry_date: dates[i],
                    entry_price_a: prices_a[i],
                    entry_price_b: prices_b[i],
                });
            }
            (Signal::Exit, Some(position)) => {
                let exit_a = prices_a[i];
                let exit_b = prices_b[i];
                let pnl = match position.direction {
                    PositionState::LongSpread => {
                        (exit_a - position.entry_price_a) - (exit_b - position.entry_price_b)
                    }
                    PositionState::ShortSpread => {
                        (position.entry_price_a - exit_a) + (position.entry_price_b - exit_b)
                    }
                    PositionState::Flat => unreachable!("open position is never flat"),
                };
                trades.push(Trade {
                    symbol_a: symbol_a.to_string(),
                    symbol_b: symbol_b.to_string(),
                    direction: position.direction,
                    entry_date: position.entry_date,
                    entry_price_a: position.entry_price_a,
                    entry_price_b: position.entry_price_b,
                    exit_date: dates[i],
                    exit_price_a: exit_a,
                    exit_price_b: exit_b,
                    pnl,
                });
                open = None;
            }
            // ENTER while already open, EXIT while flat, and NONE: no-ops.
            _ => {}
        }
    }

    Ok(trades)
}
