//! PairLab Runner — orchestration around `pairlab-core`.
//!
//! This crate wires the core pipeline into something a CLI (or any caller)
//! can use directly:
//! - Directory-of-CSVs loading with exchange-export cleanup, plus a
//!   deterministic synthetic universe for tests and demos
//! - TOML run configuration with validated defaults
//! - The single parameterized pipeline: select pair → spread/z-score →
//!   signals → advisory → backtest → JSON-safe report
//! - JSON and CSV artifact export

pub mod config;
pub mod export;
pub mod loader;
pub mod pipeline;
pub mod report;

pub use config::{ConfigError, ModeConfig, RunConfig};
pub use export::{export_json, export_trades_csv, import_json, load_artifacts, save_artifacts};
pub use loader::{load_price_dir, synthetic_universe, LoadError};
pub use pipeline::{run_pipeline, summarize, PipelineError};
pub use report::{DashboardSummary, PairReport, SignalStrength, SCHEMA_VERSION};
