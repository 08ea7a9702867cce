//! Two-File Comparison

use super::formatting::{comparison_tables, geomean_ratio_table, render_report};
use super::{OutputSettings, apply_filter, write_output};
use crate::CompareArgs;
use crate::config::UbenchConfig;
use crate::loader::load_results;
use anyhow::Context;
use std::path::Path;
use ubench_logic::{DiffOptions, Group, diff_trees};
use ubench_report::{Report, ReportMode};
use ubench_stats::{ComparisonConfig, SignificanceBackend};

/// Comparison options after layering CLI flags over the config file
#[derive(Debug, Clone, PartialEq)]
pub struct CompareSettings {
    /// Filtering and output
    pub output: OutputSettings,
    /// Differ options
    pub diff: DiffOptions,
    /// Significance provider
    pub backend: SignificanceBackend,
}

impl CompareSettings {
    /// Resolve settings: CLI flags win over `ubench.toml`.
    pub fn resolve(args: &CompareArgs, config: &UbenchConfig) -> Self {
        let backend = if args.no_significance {
            SignificanceBackend::None
        } else {
            config.significance.backend
        };

        Self {
            output: OutputSettings::resolve(&args.output, config),
            diff: DiffOptions {
                significant_only: args.significant_changes || config.compare.significant_changes,
                order_by_diff: args.order_by_diff || config.compare.order_by_diff,
                thresholds: ComparisonConfig {
                    wilcoxon_threshold: args
                        .wilcoxon_p_threshold
                        .unwrap_or(config.compare.wilcoxon_p_threshold),
                    ttest_threshold: args
                        .ttest_p_threshold
                        .unwrap_or(config.compare.ttest_p_threshold),
                },
            },
            backend,
        }
    }
}

/// Run `ubench compare`
pub fn run_compare(args: &CompareArgs, config: &UbenchConfig) -> anyhow::Result<()> {
    let settings = CompareSettings::resolve(args, config);
    let first = load_results(&args.first)?;
    let second = load_results(&args.second)?;

    let report = build_comparison(
        (&first, &args.first),
        (&second, &args.second),
        &settings,
    )?;

    let output = render_report(&report, settings.output.format, settings.output.precision)?;
    write_output(settings.output.output.as_deref(), &output)
}

/// Filter both trees, compare them and build the report.
///
/// Fails on a structural mismatch between the trees. Significance pruning is
/// turned off when no significance backend is available.
pub fn build_comparison(
    (first, first_path): (&Group, &Path),
    (second, second_path): (&Group, &Path),
    settings: &CompareSettings,
) -> anyhow::Result<Report> {
    let filter = settings.output.filter()?;
    let first = apply_filter(&filter, first, first_path);
    let second = apply_filter(&filter, second, second_path);

    let provider = settings.backend.provider();
    tracing::debug!(backend = provider.name(), "Selected significance backend");

    let mut options = settings.diff;
    if options.significant_only && !provider.is_available() {
        tracing::warn!(
            backend = provider.name(),
            "Significant-changes filter needs a significance backend, showing all changes"
        );
        options.significant_only = false;
    }

    let diff = diff_trees(&first, &second, &options, provider.as_ref()).with_context(
        || {
            format!(
                "Cannot compare {} with {}",
                first_path.display(),
                second_path.display()
            )
        },
    )?;

    let mut tables =
        comparison_tables(&diff, settings.output.verbosity, provider.is_available())?;
    if !diff.geomeans.is_empty() {
        tables.push(geomean_ratio_table(&diff.geomeans)?);
    }

    tracing::info!(
        compared = diff.compared,
        shown = diff.root.row_count(),
        "Compared results"
    );
    Ok(Report::new(
        ReportMode::Compare,
        vec![
            first_path.display().to_string(),
            second_path.display().to_string(),
        ],
        tables,
    ))
}
