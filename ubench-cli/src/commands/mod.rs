//! Command Pipelines
//!
//! Both subcommands share the same shape:
//!
//! ```text
//! result file(s) (JSON)
//!       │
//!       ▼
//! ┌─────────────┐
//! │   loader    │  Parse, unflatten "a/b/c" names
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   filter    │  Include/exclude globs
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ report/diff │  Leaf statistics or lock-step comparison, geomeans
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Tables, then human/JSON/CSV
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`report`] - Single-file summary
//! - [`compare`] - Two-file comparison
//! - [`formatting`] - Column layouts and rendering

mod compare;
mod formatting;
mod report;

pub use compare::{CompareSettings, build_comparison, run_compare};
pub use report::{build_summary, run_report};

use crate::OutputArgs;
use crate::config::UbenchConfig;
use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use ubench_logic::{Group, TreeFilter};
use ubench_report::OutputFormat;

/// Filtering and output options after layering CLI flags over the config file
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Include patterns
    pub include: Vec<String>,
    /// Exclude patterns
    pub exclude: Vec<String>,
    /// Column verbosity, at most 2
    pub verbosity: u8,
    /// Output format
    pub format: OutputFormat,
    /// Output file, stdout when `None`
    pub output: Option<PathBuf>,
    /// Decimal places in human output
    pub precision: usize,
}

impl OutputSettings {
    /// Resolve settings: CLI flags win over `ubench.toml`.
    pub fn resolve(args: &OutputArgs, config: &UbenchConfig) -> Self {
        let pick = |cli: &[String], configured: &[String]| {
            if cli.is_empty() {
                configured.to_vec()
            } else {
                cli.to_vec()
            }
        };
        let verbosity = if args.verbose > 0 {
            args.verbose
        } else {
            config.output.verbosity
        };

        Self {
            include: pick(&args.filter, &config.filter.include),
            exclude: pick(&args.filter_out, &config.filter.exclude),
            verbosity: verbosity.min(formatting::MAX_VERBOSITY),
            format: args.format.unwrap_or(config.output.format),
            output: args.output.clone(),
            precision: args.precision.unwrap_or(config.output.precision),
        }
    }

    /// Build the tree filter for these settings
    pub fn filter(&self) -> anyhow::Result<TreeFilter> {
        TreeFilter::new(self.include.as_slice(), self.exclude.as_slice())
            .context("Invalid benchmark filter")
    }
}

fn apply_filter(filter: &TreeFilter, tree: &Group, source: &Path) -> Group {
    let filtered = filter.apply(tree);
    if filtered.is_empty() && !tree.is_empty() {
        tracing::warn!(path = %source.display(), "No benchmarks left after filtering");
    }
    filtered
}

fn write_output(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    let mut text = text.to_string();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }

    if let Some(path) = path {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(text.as_bytes())?;
        tracing::info!(path = %path.display(), "Report written");
    } else {
        print!("{}", text);
    }
    Ok(())
}
