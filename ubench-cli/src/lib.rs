#![warn(missing_docs)]
//! ubench CLI Library
//!
//! Command-line front end: parses arguments, layers them over `ubench.toml`,
//! loads result files and runs the report or compare pipeline.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     ubench_cli::run()
//! }
//! ```

mod commands;
mod config;
mod loader;

pub use commands::{
    CompareSettings, OutputSettings, build_comparison, build_summary, run_compare, run_report,
};
pub use config::*;
pub use loader::{load_results, parse_results};

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use ubench_report::OutputFormat;

/// ubench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "ubench")]
#[command(author, version, about = "ubench - summarize and compare benchmark results")]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    pub verbose_log: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print statistics and geomeans for one result file
    Report(ReportArgs),
    /// Compare two result files benchmark by benchmark
    Compare(CompareArgs),
    /// Print a default ubench.toml
    Init,
}

/// Arguments of `ubench report`
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Result file (JSON)
    pub file: PathBuf,

    /// Filtering and output options
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments of `ubench compare`
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Baseline result file (JSON)
    pub first: PathBuf,

    /// Candidate result file (JSON)
    pub second: PathBuf,

    /// Only show changes that both tests find significant
    #[arg(short = 's', long)]
    pub significant_changes: bool,

    /// Sort rows by relative difference, regressions first
    #[arg(short = 'o', long)]
    pub order_by_diff: bool,

    /// Wilcoxon p-value threshold
    #[arg(long)]
    pub wilcoxon_p_threshold: Option<f64>,

    /// Paired t-test p-value threshold
    #[arg(long)]
    pub ttest_p_threshold: Option<f64>,

    /// Skip significance tests and show values only
    #[arg(long)]
    pub no_significance: bool,

    /// Filtering and output options
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options shared by `report` and `compare`
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Keep benchmarks matching this glob (repeatable), e.g. "suite/*"
    #[arg(short = 'f', long = "filter")]
    pub filter: Vec<String>,

    /// Drop benchmarks matching this glob (repeatable)
    #[arg(short = 'F', long = "filter-out")]
    pub filter_out: Vec<String>,

    /// Show more columns (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Output file (stdout if not specified)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Decimal places in human output
    #[arg(long)]
    pub precision: Option<usize>,
}

/// Run the ubench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the ubench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose_log);

    // Discover ubench.toml configuration (CLI flags override)
    let config = UbenchConfig::discover().unwrap_or_default();

    match cli.command {
        Commands::Report(args) => run_report(&args, &config),
        Commands::Compare(args) => run_compare(&args, &config),
        Commands::Init => {
            print!("{}", UbenchConfig::default_toml());
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "ubench=debug" } else { "ubench=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Tests and embedders may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
