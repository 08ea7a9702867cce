//! Integration tests for ubench
//!
//! These tests verify the end-to-end behavior from result documents to
//! rendered reports.

use clap::Parser;
use std::path::Path;
use ubench::{
    BuiltinSignificance, ComparisonConfig, DiffOptions, NoSignificance, OVERALL, TreeFilter,
    aggregate_geomeans, calc_geomean, diff_trees, filter_tree, parse_results, relative_diff,
};
use ubench_cli::{Cli, run_with_cli};

const SAMPLES: [f64; 12] = [
    100.0, 101.5, 99.2, 100.8, 98.9, 100.3, 101.1, 99.6, 100.4, 99.1, 100.9, 99.8,
];

fn samples_json(factor: f64) -> String {
    let values: Vec<String> = SAMPLES.iter().map(|x| (x * factor).to_string()).collect();
    format!("[{}]", values.join(", "))
}

/// Geomean identities
#[test]
fn test_geomean_identities() {
    assert_eq!(calc_geomean(&[7.5]), 7.5);
    assert!((calc_geomean(&[2.0, 8.0]) - 4.0).abs() < 1e-12);
    assert_eq!(calc_geomean(&[2.0, 8.0]), calc_geomean(&[8.0, 2.0]));
    assert_eq!(relative_diff(3.0, 3.0), 0.0);
    assert_eq!(relative_diff(0.0, 5.0), f64::INFINITY);
}

/// A constant shift without variance yields the exact change and undefined p-values
#[test]
fn test_zero_variance_comparison() {
    let t1 = parse_results(r#"{"bench/A": [10, 10, 10]}"#).unwrap();
    let t2 = parse_results(r#"{"bench/A": [20, 20, 20]}"#).unwrap();

    let diff = diff_trees(&t1, &t2, &DiffOptions::default(), &BuiltinSignificance).unwrap();
    let rows = diff.root.rows();
    assert_eq!(rows.len(), 1);

    let c = &rows[0].comparison;
    assert_eq!(c.baseline_stats.mean, 10.0);
    assert_eq!(c.candidate_stats.mean, 20.0);
    assert_eq!(c.relative_change, 100.0);
    assert_eq!(c.baseline_stats.std_dev_percent, 0.0);
    assert_eq!(c.candidate_stats.std_dev_percent, 0.0);
    assert!(c.significance.wilcoxon_p.is_nan());
    assert!(c.significance.ttest_p.is_nan());
}

/// Benchmarks present in only one result file never produce a row
#[test]
fn test_one_sided_benchmarks_are_omitted() {
    let t1 = parse_results(r#"{"bench/A": [1, 2], "bench/OnlyInFirst": [3, 4]}"#).unwrap();
    let t2 = parse_results(r#"{"bench/A": [1, 2]}"#).unwrap();

    let diff = diff_trees(&t1, &t2, &DiffOptions::default(), &NoSignificance).unwrap();
    let paths: Vec<_> = diff.root.rows().iter().map(|r| r.path.clone()).collect();
    assert_eq!(paths, vec!["bench/A"]);
}

/// `suite/*` keeps the suite's children only
#[test]
fn test_filter_suite_children() {
    let tree = parse_results(r#"{"other/X": [1], "suite/Y": [2]}"#).unwrap();
    let filtered = filter_tree(&tree, &["suite/*"], &[]).unwrap();

    let paths: Vec<_> = filtered.flatten().into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths, vec!["suite/Y"]);
}

/// Filtering without patterns is the identity
#[test]
fn test_filter_without_patterns() {
    let tree = parse_results(r#"{"other/X": [1], "suite/Y": [2]}"#).unwrap();
    let filter = TreeFilter::new::<&str>(&[], &[]).unwrap();
    assert_eq!(filter.apply(&tree), tree);
}

/// Comparing a tree with itself shows no change anywhere
#[test]
fn test_self_compare() {
    let json = format!(
        r#"{{"suite/A": {}, "suite/B": {}, "C": {}}}"#,
        samples_json(1.0),
        samples_json(2.0),
        samples_json(0.5)
    );
    let tree = parse_results(&json).unwrap();

    let diff = diff_trees(&tree, &tree, &DiffOptions::default(), &BuiltinSignificance).unwrap();
    assert_eq!(diff.compared, 3);
    for row in diff.root.rows() {
        assert_eq!(row.comparison.relative_change, 0.0);
        assert!(!row.comparison.is_significant(&ComparisonConfig::default()));
    }
    let overall = diff.geomeans.last().unwrap();
    assert_eq!(overall.name, OVERALL);
    assert!((overall.ratio.geomean - 1.0).abs() < 1e-12);
}

/// Zero thresholds with significance pruning leave no rows
#[test]
fn test_zero_thresholds_leave_no_rows() {
    let t1 = parse_results(&format!(r#"{{"g/A": {}}}"#, samples_json(1.0))).unwrap();
    let t2 = parse_results(&format!(r#"{{"g/A": {}}}"#, samples_json(3.0))).unwrap();
    let options = DiffOptions {
        significant_only: true,
        thresholds: ComparisonConfig {
            wilcoxon_threshold: 0.0,
            ttest_threshold: 0.0,
        },
        ..DiffOptions::default()
    };

    let diff = diff_trees(&t1, &t2, &options, &BuiltinSignificance).unwrap();
    assert_eq!(diff.root.row_count(), 0);
    assert!(!diff.geomeans.is_empty());
}

/// A clear slowdown is flagged by both tests
#[test]
fn test_clear_regression_is_significant() {
    let t1 = parse_results(&format!(r#"{{"g/A": {}}}"#, samples_json(1.0))).unwrap();
    let t2 = parse_results(&format!(r#"{{"g/A": {}}}"#, samples_json(1.5))).unwrap();
    let options = DiffOptions {
        significant_only: true,
        ..DiffOptions::default()
    };

    let diff = diff_trees(&t1, &t2, &options, &BuiltinSignificance).unwrap();
    let rows = diff.root.rows();
    assert_eq!(rows.len(), 1);
    assert!((rows[0].comparison.relative_change - 50.0).abs() < 1e-9);
}

/// Geomean rows cover every group and the whole tree
#[test]
fn test_report_geomeans() {
    let tree = parse_results(r#"{"a/x": [2, 2], "a/y": [8, 8], "b/z": [4]}"#).unwrap();
    let aggregation = aggregate_geomeans(&tree, false);

    let names: Vec<_> = aggregation.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", OVERALL]);
    assert!((aggregation.rows[0].record.geomean - 4.0).abs() < 1e-12);
    assert!((aggregation.rows[2].record.geomean - 4.0).abs() < 1e-12);
}

/// A benchmark in one file that is a group in the other is an error
#[test]
fn test_structural_mismatch_is_an_error() {
    let t1 = parse_results(r#"{"bench/A": [1]}"#).unwrap();
    let t2 = parse_results(r#"{"bench/A/inner": [1]}"#).unwrap();

    let err = diff_trees(&t1, &t2, &DiffOptions::default(), &NoSignificance).unwrap_err();
    assert!(err.to_string().contains("bench/A"));
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

/// `ubench compare` end to end, writing JSON to a file
#[test]
fn test_cli_compare_json() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(
        dir.path(),
        "first.json",
        &format!(r#"{{"suite/A": {}, "suite/B": [1, 2]}}"#, samples_json(1.0)),
    );
    let second = write(
        dir.path(),
        "second.json",
        &format!(r#"{{"suite/A": {}}}"#, samples_json(2.0)),
    );
    let output = dir.path().join("out.json").display().to_string();

    let cli = Cli::try_parse_from([
        "ubench", "compare", &first, &second, "--format", "json", "--output", &output,
    ])
    .unwrap();
    run_with_cli(cli).unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["meta"]["mode"], "compare");
    assert_eq!(report["tables"][0]["title"], "suite");
    assert_eq!(report["tables"][0]["rows"].as_array().unwrap().len(), 1);
    assert_eq!(report["tables"][0]["rows"][0][0], "A");
    assert_eq!(report["tables"][1]["title"], "GEOMEANS");
}

/// `ubench report` end to end, writing human output to a file
#[test]
fn test_cli_report_human() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "results.json",
        r#"{"suite": {"Y": [2, 4]}, "other": {"X": [1]}}"#,
    );
    let output = dir.path().join("out.txt").display().to_string();

    let cli = Cli::try_parse_from([
        "ubench", "report", &input, "-f", "suite/*", "-v", "--output", &output,
    ])
    .unwrap();
    run_with_cli(cli).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("suite:"));
    assert!(text.contains("GEOMEANS:"));
    assert!(text.contains("MAD (%)"));
    assert!(!text.contains("other"));
}

/// Unreadable inputs surface as errors
#[test]
fn test_cli_missing_input() {
    let cli = Cli::try_parse_from(["ubench", "report", "/nonexistent/results.json"]).unwrap();
    let err = run_with_cli(cli).unwrap_err();
    assert!(format!("{:#}", err).contains("results.json"));
}
