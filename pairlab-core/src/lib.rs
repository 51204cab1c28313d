//! PairLab Core — pair-trading analytics over daily closing prices.
//!
//! The pipeline, leaf to root:
//! - Data: per-symbol price series, union-date alignment with forward fill
//! - Stats: OLS, rolling windows, ADF regression, MacKinnon p-values
//! - Cointegration: pairwise Engle-Granger scan with a symmetric p-value matrix
//! - Selection: score/p-value ranking across Global/Anchor/Subset modes with
//!   an explicit correlation-only fallback
//! - Analytics: hedge ratio, spread, rolling z-score, rolling correlation
//! - Signals: FLAT/LONG_SPREAD/SHORT_SPREAD state machine plus a separate
//!   display-only advisory classifier
//! - Backtest: signal replay into closed trades with realized P&L
//!
//! Everything is synchronous batch computation; the only parallelism is the
//! embarrassingly parallel pairwise scan.

pub mod analytics;
pub mod backtest;
pub mod coint;
pub mod data;
pub mod domain;
pub mod select;
pub mod signal;
pub mod stats;

pub use analytics::{
    compute_spread_analytics, compute_spread_and_signals, sanitize, AnalyticsError,
    PairAnalytics, SpreadAnalytics, DEFAULT_WINDOW,
};
pub use backtest::{backtest, BacktestError};
pub use coint::{
    find_cointegrated_pairs, CointError, CointScan, PvalueMatrix, GLOBAL_SIGNIFICANCE,
    SUBSET_SIGNIFICANCE,
};
pub use data::{PairOverlap, PriceTable};
pub use domain::{
    Advice, PairCandidate, PairSelection, PositionState, PricePoint, PriceSeries, RankBy,
    SelectionMethod, SelectionMode, Signal, Trade,
};
pub use select::{select_best_pair, SelectError};
pub use signal::{advise, generate_signals, AdvisoryConfig, SignalConfig};

#[cfg(test)]
mod tests {
    use super::*;

    /// All pipeline value types cross thread boundaries in the parallel
    /// scan and in callers' worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<PriceTable>();
        require_sync::<PriceTable>();
        require_send::<PairCandidate>();
        require_sync::<PairCandidate>();
        require_send::<PairSelection>();
        require_sync::<PairSelection>();
        require_send::<Signal>();
        require_sync::<Signal>();
        require_send::<Trade>();
        require_sync::<Trade>();
    }
}
