//! Output Formatting
//!
//! Column layouts for both modes and conversion of computed results into
//! [`Table`]s. Verbosity adds columns:
//!
//! | verbosity | report                      | compare                                   |
//! |-----------|-----------------------------|-------------------------------------------|
//! | 0         | mean, stdev (%)             | diff (%), stdev1 (%), stdev2 (%)          |
//! | 1         | + stdev, median, MAD (%)    | + mean1, stdev1, mean2, stdev2            |
//! | 2         | + min, max, MAD             | + median1, median2, MAD1 (%), MAD2 (%)    |
//!
//! Comparisons also carry `wilcoxon p` and `t-test p` when a significance
//! backend is available.

use anyhow::Context;
use ubench_logic::{
    DiffEntry, DiffTable, GeomeanDiffRow, GeomeanRow, Group, Node, TreeDiff, join_path,
};
use ubench_report::{
    Cell, OutputFormat, Report, Table, TableError, generate_csv_report, generate_human_report,
    generate_json_report,
};
use ubench_stats::{ComparisonResult, GeomeanRecord, LeafStatistics, compute_leaf_stats};

/// Highest verbosity level with its own columns
pub const MAX_VERBOSITY: u8 = 2;

const NAME_HEADER: &str = "benchmark";
const GEOMEANS_TITLE: &str = "GEOMEANS";

/// A statistic column in report mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportColumn {
    Mean,
    StdevPercent,
    Stdev,
    Median,
    MadPercent,
    Min,
    Max,
    Mad,
}

impl ReportColumn {
    fn header(self) -> &'static str {
        match self {
            ReportColumn::Mean => "mean",
            ReportColumn::StdevPercent => "stdev (%)",
            ReportColumn::Stdev => "stdev",
            ReportColumn::Median => "median",
            ReportColumn::MadPercent => "MAD (%)",
            ReportColumn::Min => "min",
            ReportColumn::Max => "max",
            ReportColumn::Mad => "MAD",
        }
    }

    fn value(self, stats: &LeafStatistics) -> f64 {
        match self {
            ReportColumn::Mean => stats.mean,
            ReportColumn::StdevPercent => stats.std_dev_percent,
            ReportColumn::Stdev => stats.std_dev,
            ReportColumn::Median => stats.median,
            ReportColumn::MadPercent => stats.mad_percent,
            ReportColumn::Min => stats.min,
            ReportColumn::Max => stats.max,
            ReportColumn::Mad => stats.mad,
        }
    }
}

/// Report columns shown at `verbosity`
pub fn report_columns(verbosity: u8) -> Vec<ReportColumn> {
    let mut columns = vec![ReportColumn::Mean, ReportColumn::StdevPercent];
    if verbosity >= 1 {
        columns.extend([ReportColumn::Stdev, ReportColumn::Median, ReportColumn::MadPercent]);
    }
    if verbosity >= 2 {
        columns.extend([ReportColumn::Min, ReportColumn::Max, ReportColumn::Mad]);
    }
    columns
}

/// A column in compare mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareColumn {
    Diff,
    Mean1,
    Stdev1,
    Mean2,
    Stdev2,
    StdevPercent1,
    StdevPercent2,
    Median1,
    Median2,
    MadPercent1,
    MadPercent2,
    WilcoxonP,
    TTestP,
}

impl CompareColumn {
    fn header(self) -> &'static str {
        match self {
            CompareColumn::Diff => "diff (%)",
            CompareColumn::Mean1 => "mean1",
            CompareColumn::Stdev1 => "stdev1",
            CompareColumn::Mean2 => "mean2",
            CompareColumn::Stdev2 => "stdev2",
            CompareColumn::StdevPercent1 => "stdev1 (%)",
            CompareColumn::StdevPercent2 => "stdev2 (%)",
            CompareColumn::Median1 => "median1",
            CompareColumn::Median2 => "median2",
            CompareColumn::MadPercent1 => "MAD1 (%)",
            CompareColumn::MadPercent2 => "MAD2 (%)",
            CompareColumn::WilcoxonP => "wilcoxon p",
            CompareColumn::TTestP => "t-test p",
        }
    }

    fn value(self, c: &ComparisonResult) -> f64 {
        let (first, second) = (&c.baseline_stats, &c.candidate_stats);
        match self {
            CompareColumn::Diff => c.relative_change,
            CompareColumn::Mean1 => first.mean,
            CompareColumn::Stdev1 => first.std_dev,
            CompareColumn::Mean2 => second.mean,
            CompareColumn::Stdev2 => second.std_dev,
            CompareColumn::StdevPercent1 => first.std_dev_percent,
            CompareColumn::StdevPercent2 => second.std_dev_percent,
            CompareColumn::Median1 => first.median,
            CompareColumn::Median2 => second.median,
            CompareColumn::MadPercent1 => first.mad_percent,
            CompareColumn::MadPercent2 => second.mad_percent,
            CompareColumn::WilcoxonP => c.significance.wilcoxon_p,
            CompareColumn::TTestP => c.significance.ttest_p,
        }
    }
}

/// Compare columns shown at `verbosity`
pub fn compare_columns(verbosity: u8, with_significance: bool) -> Vec<CompareColumn> {
    let mut columns = vec![CompareColumn::Diff];
    if verbosity >= 1 {
        columns.extend([
            CompareColumn::Mean1,
            CompareColumn::Stdev1,
            CompareColumn::Mean2,
            CompareColumn::Stdev2,
        ]);
    }
    columns.extend([CompareColumn::StdevPercent1, CompareColumn::StdevPercent2]);
    if verbosity >= 2 {
        columns.extend([
            CompareColumn::Median1,
            CompareColumn::Median2,
            CompareColumn::MadPercent1,
            CompareColumn::MadPercent2,
        ]);
    }
    if with_significance {
        columns.extend([CompareColumn::WilcoxonP, CompareColumn::TTestP]);
    }
    columns
}

fn headers(columns: impl Iterator<Item = &'static str>) -> Vec<&'static str> {
    std::iter::once(NAME_HEADER).chain(columns).collect()
}

/// Statistics tables for one result tree: one table per group holding
/// benchmarks, titled with the group path.
pub fn summary_tables(tree: &Group, verbosity: u8) -> Result<Vec<Table>, TableError> {
    let columns = report_columns(verbosity);
    let mut tables = Vec::new();
    summary_tables_into(tree, None, 0, &columns, &mut tables)?;
    Ok(tables)
}

fn summary_tables_into(
    group: &Group,
    path: Option<&str>,
    depth: usize,
    columns: &[ReportColumn],
    tables: &mut Vec<Table>,
) -> Result<(), TableError> {
    let mut table = Table::new(headers(columns.iter().map(|c| c.header()))).with_depth(depth);
    if let Some(path) = path {
        table = table.with_title(path);
    }

    let mut nested = Vec::new();
    for (name, node) in group.iter() {
        match node {
            Node::Leaf(samples) => {
                let stats = compute_leaf_stats(samples);
                let mut row = vec![Cell::from(name)];
                row.extend(columns.iter().map(|c| Cell::Number(c.value(&stats))));
                table.push_row(row)?;
            }
            Node::Group(child) => nested.push((name, child)),
        }
    }

    if !table.is_empty() {
        tables.push(table);
    }
    for (name, child) in nested {
        let child_path = join_path(path.unwrap_or_default(), name);
        let child_depth = if path.is_some() { depth + 1 } else { depth };
        summary_tables_into(child, Some(&child_path), child_depth, columns, tables)?;
    }
    Ok(())
}

/// Comparison tables for a tree diff, one per group holding benchmark rows.
pub fn comparison_tables(
    diff: &TreeDiff,
    verbosity: u8,
    with_significance: bool,
) -> Result<Vec<Table>, TableError> {
    let columns = compare_columns(verbosity, with_significance);
    let mut tables = Vec::new();
    comparison_tables_into(&diff.root, &columns, &mut tables)?;
    Ok(tables)
}

fn comparison_tables_into(
    diff: &DiffTable,
    columns: &[CompareColumn],
    tables: &mut Vec<Table>,
) -> Result<(), TableError> {
    let mut table = Table::new(headers(columns.iter().map(|c| c.header()))).with_depth(diff.depth);
    if !diff.path.is_empty() {
        table = table.with_title(diff.path.as_str());
    }

    for entry in &diff.entries {
        if let DiffEntry::Benchmark(row) = entry {
            let mut cells = vec![Cell::from(row.name.as_str())];
            cells.extend(columns.iter().map(|c| Cell::Number(c.value(&row.comparison))));
            table.push_row(cells)?;
        }
    }
    if !table.is_empty() {
        tables.push(table);
    }

    for entry in &diff.entries {
        if let DiffEntry::Group(nested) = entry {
            comparison_tables_into(nested, columns, tables)?;
        }
    }
    Ok(())
}

fn geomean_cells(name: &str, record: &GeomeanRecord) -> Vec<Cell> {
    vec![
        Cell::from(name),
        Cell::Number(record.geomean),
        Cell::Number(record.error),
        Cell::Number(record.error_percent),
    ]
}

/// GEOMEANS table for report mode
pub fn geomean_table(rows: &[GeomeanRow]) -> Result<Table, TableError> {
    let mut table =
        Table::new(["name", "geomean", "error", "error (%)"]).with_title(GEOMEANS_TITLE);
    for row in rows {
        table.push_row(geomean_cells(&row.name, &row.record))?;
    }
    Ok(table)
}

/// GEOMEANS table for compare mode
pub fn geomean_ratio_table(rows: &[GeomeanDiffRow]) -> Result<Table, TableError> {
    let mut table =
        Table::new(["name", "ratio", "error", "error (%)"]).with_title(GEOMEANS_TITLE);
    for row in rows {
        table.push_row(geomean_cells(&row.name, &row.ratio))?;
    }
    Ok(table)
}

/// Render a report in the requested format
pub fn render_report(report: &Report, format: OutputFormat, precision: usize) -> anyhow::Result<String> {
    let output = match format {
        OutputFormat::Human => generate_human_report(report, precision),
        OutputFormat::Json => generate_json_report(report).context("Failed to encode JSON report")?,
        OutputFormat::Csv => generate_csv_report(report).context("Failed to encode CSV report")?,
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ubench_logic::{DiffOptions, aggregate_geomeans, diff_trees};
    use ubench_stats::{BuiltinSignificance, NoSignificance};

    fn tree() -> Group {
        Group::new()
            .with("top", vec![1.0, 3.0])
            .with(
                "suite",
                Group::new()
                    .with("A", vec![2.0, 2.0])
                    .with("inner", Group::new().with("B", vec![4.0])),
            )
    }

    #[test]
    fn test_report_columns_by_verbosity() {
        assert_eq!(report_columns(0).len(), 2);
        assert_eq!(report_columns(1).len(), 5);
        assert_eq!(report_columns(2).len(), 8);
        assert_eq!(report_columns(7), report_columns(2));
    }

    #[test]
    fn test_compare_columns_by_verbosity() {
        let headers: Vec<_> = compare_columns(0, true).iter().map(|c| c.header()).collect();
        assert_eq!(
            headers,
            vec!["diff (%)", "stdev1 (%)", "stdev2 (%)", "wilcoxon p", "t-test p"]
        );
        assert_eq!(compare_columns(0, false).len(), 3);
        assert_eq!(compare_columns(1, false).len(), 7);
        assert_eq!(compare_columns(2, false).len(), 11);
    }

    #[test]
    fn test_summary_tables() {
        let tables = summary_tables(&tree(), 0).unwrap();
        assert_eq!(tables.len(), 3);

        assert_eq!(tables[0].title, None);
        assert_eq!(tables[0].headers(), ["benchmark", "mean", "stdev (%)"]);
        assert_eq!(tables[0].rows()[0], vec![Cell::from("top"), 2.0.into(), 50.0.into()]);

        assert_eq!(tables[1].title.as_deref(), Some("suite"));
        assert_eq!(tables[1].depth, 0);
        assert_eq!(tables[2].title.as_deref(), Some("suite/inner"));
        assert_eq!(tables[2].depth, 1);
    }

    #[test]
    fn test_geomean_table() {
        let agg = aggregate_geomeans(&tree(), false);
        let table = geomean_table(&agg.rows).unwrap();
        let names: Vec<_> = table.rows().iter().map(|row| row[0].clone()).collect();
        assert_eq!(
            names,
            vec![Cell::from("suite/inner"), "suite".into(), "OVERALL".into()]
        );
    }

    #[test]
    fn test_comparison_tables() {
        let t2 = Group::new()
            .with("top", vec![2.0, 6.0])
            .with("suite", Group::new().with("A", vec![2.0, 2.0]));
        let diff = diff_trees(&tree(), &t2, &DiffOptions::default(), &BuiltinSignificance).unwrap();

        let tables = comparison_tables(&diff, 1, true).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers().len(), 10);
        assert_eq!(tables[0].rows()[0][0], Cell::from("top"));
        assert_eq!(tables[0].rows()[0][1], Cell::Number(100.0));
        assert_eq!(tables[1].title.as_deref(), Some("suite"));

        let ratios = geomean_ratio_table(&diff.geomeans).unwrap();
        assert_eq!(ratios.rows().len(), 2);
    }

    #[test]
    fn test_comparison_without_significance_columns() {
        let diff = diff_trees(&tree(), &tree(), &DiffOptions::default(), &NoSignificance).unwrap();
        let tables = comparison_tables(&diff, 0, false).unwrap();
        assert!(tables.iter().all(|t| t.headers().len() == 4));
    }

    #[test]
    fn test_render_report_formats() {
        let tables = summary_tables(&tree(), 0).unwrap();
        let report = Report::new(ubench_report::ReportMode::Report, vec![], tables);

        let human = render_report(&report, OutputFormat::Human, 2).unwrap();
        assert!(human.contains("suite/inner:"));
        let json = render_report(&report, OutputFormat::Json, 2).unwrap();
        assert!(json.contains("\"mode\": \"report\""));
        let csv = render_report(&report, OutputFormat::Csv, 2).unwrap();
        assert!(csv.starts_with("table,benchmark,mean,stdev (%)"));
    }
}
