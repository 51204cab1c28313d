//! Z-score signal state machine and the advisory classifier.
//!
//! Two threshold schemes live here and they are intentionally different:
//! the entry/exit state machine (±2.0 in, 0.5 out, driven by the current
//! z-score) produces the signals the backtester consumes, while the
//! advisory classifier (±1.2 on the mean of the last five z-scores) is a
//! display-only label. Do not unify them.

use serde::{Deserialize, Serialize};

use crate::domain::{Advice, PositionState, Signal};

/// Thresholds for the entry/exit state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// |z| above which a FLAT machine opens a position.
    pub entry_z: f64,
    /// |z| below which an open position closes.
    pub exit_z: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            entry_z: 2.0,
            exit_z: 0.5,
        }
    }
}

/// Run the three-state machine over a z-score sequence.
///
/// Evaluated once per date in order, using only z[t] and the state carried
/// from t-1; the initial state is FLAT. Entries fire only from FLAT (no
/// pyramiding, no direct long/short flip); from an open position the only
/// transition is EXIT when |z| drops inside the exit band. A NaN z-score
/// satisfies no condition and holds the current state.
pub fn generate_signals(zscores: &[f64], config: &SignalConfig) -> Vec<Signal> {
    let mut state = PositionState::Flat;
    let mut signals = Vec::with_capacity(zscores.len());

    for &z in zscores {
        let signal = match state {
            PositionState::Flat => {
                if z > config.entry_z {
                    state = PositionState::ShortSpread;
                    Signal::EnterShortSpread
                } else if z < -config.entry_z {
                    state = PositionState::LongSpread;
                    Signal::EnterLongSpread
                } else {
                    Signal::None
                }
            }
            PositionState::LongSpread | PositionState::ShortSpread => {
                if z.abs() < config.exit_z {
                    state = PositionState::Flat;
                    Signal::Exit
                } else {
                    Signal::None
                }
            }
        };
        signals.push(signal);
    }

    signals
}

/// Configuration for the advisory label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// |mean z| above which a direction is suggested.
    pub threshold: f64,
    /// How many trailing z-scores to average.
    pub lookback: usize,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            threshold: 1.2,
            lookback: 5,
        }
    }
}

/// Classify the trailing mean of the z-score into a display recommendation.
///
/// Uses the raw series: if the trailing window contains an undefined
/// z-score the mean is undefined and the advice is Hold.
pub fn advise(zscores: &[f64], config: &AdvisoryConfig) -> Advice {
    if zscores.is_empty() || config.lookback == 0 {
        return Advice::Hold;
    }
    let start = zscores.len().saturating_sub(config.lookback);
    let tail = &zscores[start..];
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;

    if !mean.is_finite() {
        Advice::Hold
    } else if mean > config.threshold {
        Advice::SellABuyB
    } else if mean < -config.threshold {
        Advice::BuyASellB
    } else {
        Advice::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_short_then_long() {
        let z = [0.0, 2.5, 1.0, 0.3, -2.1, -1.0, -0.2, 0.0];
        let s = generate_signals(&z, &SignalConfig::default());
        assert_eq!(
            s,
            vec![
                Signal::None,
                Signal::EnterShortSpread,
                Signal::None, // held: |z| >= 0.5
                Signal::Exit,
                Signal::EnterLongSpread,
                Signal::None,
                Signal::Exit,
                Signal::None,
            ]
        );
    }

    #[test]
    fn no_reentry_while_open() {
        // A second extreme while short must not re-enter or flip.
        let z = [2.5, 3.0, -3.0, 0.1];
        let s = generate_signals(&z, &SignalConfig::default());
        assert_eq!(
            s,
            vec![
                Signal::EnterShortSpread,
                Signal::None,
                Signal::None,
                Signal::Exit
            ]
        );
    }

    #[test]
    fn nan_holds_state() {
        let z = [f64::NAN, 2.5, f64::NAN, 0.1];
        let s = generate_signals(&z, &SignalConfig::default());
        assert_eq!(
            s,
            vec![
                Signal::None,
                Signal::EnterShortSpread,
                Signal::None,
                Signal::Exit
            ]
        );
    }

    #[test]
    fn boundary_values_do_not_trigger() {
        // Entries need strict >, exits need strict <.
        let z = [2.0, -2.0, 0.5];
        let s = generate_signals(&z, &SignalConfig::default());
        assert_eq!(s, vec![Signal::None; 3]);
    }

    #[test]
    fn advisory_uses_trailing_mean() {
        let cfg = AdvisoryConfig::default();
        assert_eq!(advise(&[0.0, 0.0, 2.0, 2.0, 2.0, 2.0, 2.0], &cfg), Advice::SellABuyB);
        assert_eq!(advise(&[-2.0, -2.0, -2.0, -2.0, -2.0], &cfg), Advice::BuyASellB);
        assert_eq!(advise(&[0.1, -0.1, 0.2, -0.2, 0.0], &cfg), Advice::Hold);
        // Shorter history than the lookback: average what exists.
        assert_eq!(advise(&[2.0, 2.0], &cfg), Advice::SellABuyB);
        // Undefined z inside the window: no suggestion.
        assert_eq!(advise(&[2.0, f64::NAN, 2.0, 2.0, 2.0], &cfg), Advice::Hold);
        assert_eq!(advise(&[], &cfg), Advice::Hold);
    }

    #[test]
    fn advisory_threshold_is_its_own_scheme() {
        // 1.5 is above the advisory threshold but below the entry
        // threshold: advice fires, the state machine does not.
        let z = [1.5, 1.5, 1.5, 1.5, 1.5];
        assert_eq!(advise(&z, &AdvisoryConfig::default()), Advice::SellABuyB);
        let s = generate_signals(&z, &SignalConfig::default());
        assert!(s.iter().all(|sig| *sig == Signal::None));
    }
}
