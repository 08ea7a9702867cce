#![warn(missing_docs)]
//! # ubench
//!
//! Summarize and compare benchmark results stored as JSON trees.
//!
//! - **Leaf statistics**: min, max, median, MAD, mean and population stdev per benchmark
//! - **Geomeans**: per-group and overall geometric means with propagated error
//! - **Filtering**: shell-style globs matched against path segments
//! - **Comparison**: lock-step diff of two result trees with paired Wilcoxon
//!   signed-rank and t-test p-values
//! - **Output**: aligned text tables, JSON or CSV
//!
//! ## Quick Start
//!
//! ```ignore
//! use ubench::{BuiltinSignificance, DiffOptions, diff_trees, parse_results};
//!
//! let before = parse_results(r#"{"suite/A": [10, 11, 10]}"#)?;
//! let after = parse_results(r#"{"suite/A": [12, 12, 13]}"#)?;
//! let diff = diff_trees(&before, &after, &DiffOptions::default(), &BuiltinSignificance)?;
//! for row in diff.root.rows() {
//!     println!("{}: {:+.1}%", row.path, row.comparison.relative_change);
//! }
//! ```
//!
//! ## Result Files
//!
//! An object is a group and an array of numbers is a benchmark's samples.
//! Names containing `/` are split into nested groups:
//!
//! ```text
//! {"benchmarks/Loop/Sum": [1.0, 1.1], "benchmarks/Loop/Mul": [2.0, 2.1]}
//! ```

// Re-export stats
pub use ubench_stats::{
    BuiltinSignificance, ComparisonConfig, ComparisonResult, GeomeanRecord, LeafStatistics,
    NoSignificance, Significance, SignificanceBackend, SignificanceTestProvider, calc_geomean,
    calc_geomean_error, calc_geomean_relation_error, compare_samples, compute_leaf_stats,
    paired_t_test, ratio_percent, relative_diff, wilcoxon_signed_rank,
};

// Re-export tree logic
pub use ubench_logic::{
    Aggregation, DiffEntry, DiffError, DiffOptions, DiffRow, DiffTable, FilterError,
    GeomeanDiffRow, GeomeanRow, Group, Node, NodeKind, OVERALL, TreeDiff, TreeError, TreeFilter,
    aggregate_geomeans, diff_trees, filter_tree,
};

// Re-export reporting
pub use ubench_report::{Cell, OutputFormat, Report, ReportMode, Table, TableError, render_table};

// Re-export CLI helpers
pub use ubench_cli::{UbenchConfig, load_results, parse_results};

/// Run the ubench command-line interface.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     ubench::run()
/// }
/// ```
pub use ubench_cli::run;
