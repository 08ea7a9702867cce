//! Tree Comparison
//!
//! Walks two result trees in lock-step by name and compares the benchmarks
//! present in both.
//!
//! ```text
//! T1 group ──┬── name only in T1 ────────► skipped
//!            ├── leaf / leaf ────────────► DiffRow (stats, diff, p-values)
//!            ├── group / group ──────────► nested DiffTable (recursive)
//!            └── leaf / group ───────────► DiffError::StructuralMismatch
//! ```
//!
//! Geomean ratio rows are produced for every matched group and for the whole
//! tree, before significance pruning removes anything.

use crate::aggregate::OVERALL;
use crate::tree::{Group, Node, NodeKind, join_path};
use fxhash::FxHashMap;
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{debug, warn};
use ubench_stats::{
    ComparisonConfig, ComparisonResult, GeomeanRecord, MIN_SIGNIFICANCE_SAMPLES,
    SignificanceTestProvider, compare_samples,
};

/// Errors from comparing two trees
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiffError {
    /// The same path is a benchmark in one tree and a group in the other
    #[error("Structural mismatch at '{path}': {left} in the first results, {right} in the second")]
    StructuralMismatch {
        /// Path of the diverging node
        path: String,
        /// Node kind in the first tree
        left: NodeKind,
        /// Node kind in the second tree
        right: NodeKind,
    },
}

/// Options controlling a comparison
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiffOptions {
    /// Keep only benchmarks whose change is significant under both tests
    pub significant_only: bool,
    /// Sort every table by relative difference
    pub order_by_diff: bool,
    /// p-value thresholds
    pub thresholds: ComparisonConfig,
}

/// Comparison of one benchmark present in both trees
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRow {
    /// Benchmark name within its group
    pub name: String,
    /// Full slash-joined path
    pub path: String,
    /// Statistics, relative change and significance
    pub comparison: ComparisonResult,
}

/// Entry of a [`DiffTable`]
#[derive(Debug, Clone, PartialEq)]
pub enum DiffEntry {
    /// A compared benchmark
    Benchmark(DiffRow),
    /// A nested group
    Group(DiffTable),
}

impl DiffEntry {
    /// Relative change in percent used for ordering.
    ///
    /// Groups use their geomean ratio expressed as a percentage change.
    pub fn relative_change(&self) -> f64 {
        match self {
            DiffEntry::Benchmark(row) => row.comparison.relative_change,
            DiffEntry::Group(table) => table
                .geomean
                .map_or(f64::NAN, |g| (g.geomean - 1.0) * 100.0),
        }
    }
}

/// Comparison of one group present in both trees
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffTable {
    /// Group name (empty for the root)
    pub name: String,
    /// Full slash-joined path (empty for the root)
    pub path: String,
    /// Nesting depth, the root and its direct child groups are at 0
    pub depth: usize,
    /// Compared benchmarks and nested groups
    pub entries: Vec<DiffEntry>,
    /// Geomean ratio over every benchmark beneath this group
    pub geomean: Option<GeomeanRecord>,
}

impl DiffTable {
    /// Number of benchmark rows beneath this table
    pub fn row_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                DiffEntry::Benchmark(_) => 1,
                DiffEntry::Group(table) => table.row_count(),
            })
            .sum()
    }

    /// Benchmark rows beneath this table, depth first
    pub fn rows(&self) -> Vec<&DiffRow> {
        let mut out = Vec::new();
        self.collect_rows(&mut out);
        out
    }

    fn collect_rows<'a>(&'a self, out: &mut Vec<&'a DiffRow>) {
        for entry in &self.entries {
            match entry {
                DiffEntry::Benchmark(row) => out.push(row),
                DiffEntry::Group(table) => table.collect_rows(out),
            }
        }
    }
}

/// Geomean ratio `geomean(means2) / geomean(means1)` for a group
#[derive(Debug, Clone, PartialEq)]
pub struct GeomeanDiffRow {
    /// Group path, or [`OVERALL`]
    pub name: String,
    /// Nesting depth
    pub depth: usize,
    /// Number of benchmark pairs folded into the ratio
    pub count: usize,
    /// Ratio and its combined propagated error
    pub ratio: GeomeanRecord,
}

/// Result of [`diff_trees`]
#[derive(Debug, Clone, PartialEq)]
pub struct TreeDiff {
    /// Root table
    pub root: DiffTable,
    /// Geomean ratio rows in post-order, [`OVERALL`] last
    pub geomeans: Vec<GeomeanDiffRow>,
    /// Number of benchmark pairs compared
    pub compared: usize,
    /// Pairs with too few samples for trustworthy p-values
    pub low_confidence: usize,
}

struct DiffContext<'a> {
    options: &'a DiffOptions,
    provider: &'a dyn SignificanceTestProvider,
}

#[derive(Default)]
struct Walk {
    entries: Vec<DiffEntry>,
    means1: Vec<f64>,
    stdevs1: Vec<f64>,
    means2: Vec<f64>,
    stdevs2: Vec<f64>,
    geomeans: Vec<GeomeanDiffRow>,
    compared: usize,
    low_confidence: usize,
}

impl Walk {
    fn ratio(&self) -> Option<GeomeanRecord> {
        if self.means1.is_empty() {
            return None;
        }
        Some(GeomeanRecord::ratio(
            &self.means1,
            &self.stdevs1,
            &self.means2,
            &self.stdevs2,
        ))
    }

    fn absorb(&mut self, child: Walk) {
        self.means1.extend(child.means1);
        self.stdevs1.extend(child.stdevs1);
        self.means2.extend(child.means2);
        self.stdevs2.extend(child.stdevs2);
        self.geomeans.extend(child.geomeans);
        self.compared += child.compared;
        self.low_confidence += child.low_confidence;
    }
}

/// Compare `first` against `second`.
///
/// Names present in only one tree are skipped. A path that is a benchmark on
/// one side and a group on the other aborts the comparison.
pub fn diff_trees(
    first: &Group,
    second: &Group,
    options: &DiffOptions,
    provider: &dyn SignificanceTestProvider,
) -> Result<TreeDiff, DiffError> {
    let ctx = DiffContext { options, provider };
    let mut walk = diff_children(first, second, "", 0, &ctx)?;

    let geomean = walk.ratio();
    if let Some(ratio) = geomean {
        walk.geomeans.push(GeomeanDiffRow {
            name: OVERALL.to_string(),
            depth: 0,
            count: walk.means1.len(),
            ratio,
        });
    }

    if walk.low_confidence > 0 {
        warn!(
            pairs = walk.low_confidence,
            compared = walk.compared,
            min_samples = MIN_SIGNIFICANCE_SAMPLES,
            "Too few samples for reliable significance tests"
        );
    }

    let mut entries = std::mem::take(&mut walk.entries);
    if options.order_by_diff {
        order_by_diff(&mut entries);
    }

    Ok(TreeDiff {
        root: DiffTable {
            name: String::new(),
            path: String::new(),
            depth: 0,
            entries,
            geomean,
        },
        geomeans: walk.geomeans,
        compared: walk.compared,
        low_confidence: walk.low_confidence,
    })
}

fn diff_children(
    first: &Group,
    second: &Group,
    prefix: &str,
    depth: usize,
    ctx: &DiffContext<'_>,
) -> Result<Walk, DiffError> {
    let index: FxHashMap<&str, &Node> = second.iter().collect();
    let mut walk = Walk::default();

    for (name, left) in first.iter() {
        let path = join_path(prefix, name);
        let Some(right) = index.get(name).copied() else {
            debug!(path = %path, "Only present in the first results, skipping");
            continue;
        };

        match (left, right) {
            (Node::Leaf(a), Node::Leaf(b)) => {
                if a.is_empty() || b.is_empty() {
                    debug!(path = %path, "Benchmark without samples, skipping");
                    continue;
                }
                let comparison = compare_samples(a, b, ctx.provider);
                walk.compared += 1;
                if comparison.low_confidence {
                    walk.low_confidence += 1;
                }
                walk.means1.push(comparison.baseline_stats.mean);
                walk.stdevs1.push(comparison.baseline_stats.std_dev);
                walk.means2.push(comparison.candidate_stats.mean);
                walk.stdevs2.push(comparison.candidate_stats.std_dev);

                if !ctx.options.significant_only
                    || comparison.is_significant(&ctx.options.thresholds)
                {
                    walk.entries.push(DiffEntry::Benchmark(DiffRow {
                        name: name.to_string(),
                        path,
                        comparison,
                    }));
                }
            }
            (Node::Group(a), Node::Group(b)) => {
                let mut child = diff_children(a, b, &path, depth + 1, ctx)?;
                let geomean = child.ratio();
                if let Some(ratio) = geomean {
                    child.geomeans.push(GeomeanDiffRow {
                        name: path.clone(),
                        depth,
                        count: child.means1.len(),
                        ratio,
                    });
                }

                let mut entries = std::mem::take(&mut child.entries);
                walk.absorb(child);
                if entries.is_empty() {
                    debug!(path = %path, "No rows left in group");
                    continue;
                }
                if ctx.options.order_by_diff {
                    order_by_diff(&mut entries);
                }
                walk.entries.push(DiffEntry::Group(DiffTable {
                    name: name.to_string(),
                    path,
                    depth,
                    entries,
                    geomean,
                }));
            }
            (left, right) => {
                return Err(DiffError::StructuralMismatch {
                    path,
                    left: left.kind(),
                    right: right.kind(),
                });
            }
        }
    }

    Ok(walk)
}

/// Sort entries: regressions first, then improvements, each by descending
/// magnitude. Undefined changes go last.
pub fn order_by_diff(entries: &mut [DiffEntry]) {
    entries.sort_by(|a, b| compare_changes(a.relative_change(), b.relative_change()));
}

fn compare_changes(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let regressed_a = a > 0.0;
            let regressed_b = b > 0.0;
            regressed_b
                .cmp(&regressed_a)
                .then_with(|| b.abs().total_cmp(&a.abs()))
        }
    }
}
