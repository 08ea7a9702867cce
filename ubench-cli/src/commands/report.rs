//! Single-File Summary

use super::formatting::{geomean_table, render_report, summary_tables};
use super::{OutputSettings, apply_filter, write_output};
use crate::ReportArgs;
use crate::config::UbenchConfig;
use crate::loader::load_results;
use std::path::Path;
use ubench_logic::{Group, aggregate_geomeans};
use ubench_report::{Report, ReportMode};

/// Run `ubench report`
pub fn run_report(args: &ReportArgs, config: &UbenchConfig) -> anyhow::Result<()> {
    let settings = OutputSettings::resolve(&args.output, config);
    let tree = load_results(&args.file)?;
    let report = build_summary(&tree, &args.file, &settings)?;

    let output = render_report(&report, settings.format, settings.precision)?;
    write_output(settings.output.as_deref(), &output)
}

/// Filter a result tree and summarize it into a report.
pub fn build_summary(
    tree: &Group,
    source: &Path,
    settings: &OutputSettings,
) -> anyhow::Result<Report> {
    let filter = settings.filter()?;
    let tree = apply_filter(&filter, tree, source);

    let mut tables = summary_tables(&tree, settings.verbosity)?;
    let aggregation = aggregate_geomeans(&tree, true);
    if !aggregation.rows.is_empty() {
        tables.push(geomean_table(&aggregation.rows)?);
    }

    tracing::info!(
        benchmarks = aggregation.means.len(),
        tables = tables.len(),
        "Summarized results"
    );
    Ok(Report::new(
        ReportMode::Report,
        vec![source.display().to_string()],
        tables,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputArgs;

    fn settings(filter: &[&str]) -> OutputSettings {
        let args = OutputArgs {
            filter: filter.iter().map(|s| s.to_string()).collect(),
            ..OutputArgs::default()
        };
        OutputSettings::resolve(&args, &UbenchConfig::default())
    }

    fn tree() -> Group {
        Group::new()
            .with("suite", Group::new().with("Y", vec![2.0, 4.0]))
            .with("other", Group::new().with("X", vec![1.0]))
    }

    #[test]
    fn test_summary_includes_geomeans() {
        let report = build_summary(&tree(), Path::new("r.json"), &settings(&[])).unwrap();
        let titles: Vec<_> = report.tables.iter().map(|t| t.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("suite"), Some("other"), Some("GEOMEANS")]);
        assert_eq!(report.meta.mode, ReportMode::Report);
        assert_eq!(report.meta.inputs, vec!["r.json"]);
    }

    #[test]
    fn test_summary_filtered() {
        let report = build_summary(&tree(), Path::new("r.json"), &settings(&["suite/*"])).unwrap();
        let titles: Vec<_> = report.tables.iter().map(|t| t.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("suite"), Some("GEOMEANS")]);
    }

    #[test]
    fn test_summary_empty_after_filter() {
        let report = build_summary(&tree(), Path::new("r.json"), &settings(&["nothing"])).unwrap();
        assert!(report.tables.is_empty());
    }
}
