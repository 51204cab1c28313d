//! PairLab CLI — scan, run, and summary commands.
//!
//! Commands:
//! - `scan` — cointegration scan over a directory of price CSVs, printed as
//!   a candidate table
//! - `run` — full pipeline (select, analyze, signal, backtest) with
//!   artifacts saved as report.json + trades.csv
//! - `summary` — condensed dashboard view of a saved report

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pairlab_core::{find_cointegrated_pairs, RankBy, SelectionMethod, GLOBAL_SIGNIFICANCE};
use pairlab_runner::{
    load_artifacts, load_price_dir, run_pipeline, save_artifacts, summarize, synthetic_universe,
    ModeConfig, PairReport, RunConfig,
};

#[derive(Parser)]
#[command(name = "pairlab", about = "PairLab CLI — pair-trading analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory of price CSVs for cointegrated pairs.
    Scan {
        /// Directory of per-symbol price CSVs.
        data_dir: PathBuf,

        /// Significance threshold for the p-value cut.
        #[arg(long, default_value_t = GLOBAL_SIGNIFICANCE)]
        significance: f64,
    },
    /// Run the full pipeline and save report artifacts.
    Run {
        /// Directory of per-symbol price CSVs.
        #[arg(long, required_unless_present = "synthetic")]
        data_dir: Option<PathBuf>,

        /// Use a deterministic synthetic universe instead of real data.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Path to a TOML run config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Anchor symbol: the selected pair must contain it.
        #[arg(long)]
        anchor: Option<String>,

        /// Restrict the universe to these symbols (requires --anchor).
        #[arg(long, num_args = 2.., value_delimiter = ',')]
        symbols: Option<Vec<String>>,

        /// Ranking strategy: pvalue or score.
        #[arg(long)]
        rank_by: Option<String>,

        /// Rolling window override, in trading days.
        #[arg(long)]
        window: Option<usize>,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Print the dashboard summary of a saved report.
    Summary {
        /// Artifact directory containing report.json.
        run_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan {
            data_dir,
            significance,
        } => run_scan(&data_dir, significance),
        Commands::Run {
            data_dir,
            synthetic,
            config,
            anchor,
            symbols,
            rank_by,
            window,
            output_dir,
        } => run_pipeline_cmd(
            data_dir, synthetic, config, anchor, symbols, rank_by, window, output_dir,
        ),
        Commands::Summary { run_dir } => run_summary(&run_dir),
    }
}

fn run_scan(data_dir: &std::path::Path, significance: f64) -> Result<()> {
    let table = load_price_dir(data_dir)?;
    let scan = find_cointegrated_pairs(&table, significance)?;

    if scan.pairs.is_empty() {
        println!(
            "No pair cleared p < {significance} across {} symbols.",
            table.symbols().len()
        );
        return Ok(());
    }

    let mut pairs = scan.pairs.clone();
    pairs.sort_by(|a, b| a.pvalue.total_cmp(&b.pvalue));

    println!(
        "{:<10} {:<10} {:>10} {:>8} {:>8}",
        "Leg A", "Leg B", "p-value", "corr", "score"
    );
    println!("{}", "-".repeat(50));
    for c in &pairs {
        println!(
            "{:<10} {:<10} {:>10.5} {:>8} {:>8}",
            c.symbol_a,
            c.symbol_b,
            c.pvalue,
            fmt_stat(c.correlation),
            fmt_stat(c.score)
        );
    }
    println!();
    println!(
        "{} candidate(s) at p < {significance} over {} symbols.",
        pairs.len(),
        table.symbols().len()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_pipeline_cmd(
    data_dir: Option<PathBuf>,
    synthetic: bool,
    config_path: Option<PathBuf>,
    anchor: Option<String>,
    symbols: Option<Vec<String>>,
    rank_by: Option<String>,
    window: Option<usize>,
    output_dir: PathBuf,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RunConfig::load(&path)?,
        None => RunConfig::default(),
    };

    // Flag overrides on top of the file (or the defaults).
    if let Some(rank_by) = rank_by {
        config.rank_by = parse_rank_by(&rank_by)?;
    }
    if let Some(window) = window {
        config.window = window;
    }
    match (symbols, anchor) {
        (Some(symbols), Some(anchor)) => {
            config.mode = ModeConfig::Subset { symbols, anchor };
        }
        (Some(_), None) => bail!("--symbols requires --anchor"),
        (None, Some(anchor)) => {
            config.mode = ModeConfig::Anchor { anchor };
        }
        (None, None) => {}
    }
    config.validate()?;

    let table = if synthetic {
        synthetic_universe(6, 500, 42)
    } else {
        // required_unless_present guarantees the path here
        load_price_dir(&data_dir.unwrap())?
    };

    let report = run_pipeline(&table, &config)?;
    print_report(&report, synthetic);

    let run_dir = save_artifacts(&report, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn run_summary(run_dir: &std::path::Path) -> Result<()> {
    let report = load_artifacts(run_dir)?;
    let summary = summarize(&report);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Table cell for a statistic that may be undefined (e.g. the correlation
/// of a degenerate candidate).
fn fmt_stat(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.3}")
    } else {
        "-".to_string()
    }
}

fn parse_rank_by(raw: &str) -> Result<RankBy> {
    match raw.to_ascii_lowercase().as_str() {
        "pvalue" | "p-value" => Ok(RankBy::PValue),
        "score" => Ok(RankBy::Score),
        _ => bail!("unknown ranking '{raw}'. Valid: pvalue, score"),
    }
}

fn print_report(report: &PairReport, synthetic: bool) {
    println!();
    println!("=== Pair Report ===");
    println!("Pair:           {}", report.pair_label());
    if let (Some(first), Some(last)) = (report.dates.first(), report.dates.last()) {
        println!("Period:         {first} to {last} ({} days)", report.dates.len());
    }
    match report.method {
        SelectionMethod::Cointegration => {
            println!("p-value:        {:.5}", report.pvalue);
        }
        SelectionMethod::CorrelationFallback => {
            println!("p-value:        (correlation fallback, not significant)");
        }
    }
    if let Some(corr) = report.correlation {
        println!("Correlation:    {corr:.3}");
    }
    if let Some(score) = report.score {
        println!("Score:          {score:.3}");
    }
    println!("Hedge ratio:    {:.4}", report.hedge_ratio);
    println!();
    println!("--- Signals ---");
    println!(
        "Latest z-score: {:.3}",
        report.zscore.last().copied().unwrap_or(0.0)
    );
    println!("Latest signal:  {:?}", report.latest_signal);
    println!("Advice:         {:?}", report.advice);
    println!();
    println!("--- Backtest ---");
    println!("Trades:         {}", report.trades.len());
    println!("Total P&L:      {:.2}", report.total_pnl);
    if synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}
