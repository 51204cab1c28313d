//! Price data: alignment, forward-fill, and CSV ingestion.

pub mod align;
pub mod ingest;

pub use align::{PairOverlap, PriceTable};
pub use ingest::{read_price_csv, IngestError};
