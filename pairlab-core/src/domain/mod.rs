//! Domain types — immutable value records flowing through the pipeline.

pub mod pair;
pub mod series;
pub mod signal;
pub mod trade;

pub use pair::{PairCandidate, PairSelection, RankBy, SelectionMethod, SelectionMode};
pub use series::{PricePoint, PriceSeries};
pub use signal::{Advice, PositionState, Signal};
pub use trade::Trade;
