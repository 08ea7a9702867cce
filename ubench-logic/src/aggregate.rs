//! Geomean Aggregation
//!
//! Summarizes a result tree bottom-up. Each group reports the geometric mean
//! of the means of every benchmark beneath it, with the propagated error of
//! their standard deviations. A final [`OVERALL`] row covers the whole tree.

use crate::tree::{Group, Node, join_path};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ubench_stats::{
    GeomeanRecord, calc_geomean, calc_geomean_error, compute_leaf_stats, ratio_percent,
};

/// Name of the row aggregating every benchmark in the tree
pub const OVERALL: &str = "OVERALL";

/// One geomean row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeomeanRow {
    /// Slash-joined path of the group or benchmark, or [`OVERALL`]
    pub name: String,
    /// Depth in the tree (top-level entries are at depth 0)
    pub depth: usize,
    /// Number of benchmark means folded into this row
    pub count: usize,
    /// Geomean and propagated error
    pub record: GeomeanRecord,
}

/// Output of [`aggregate_geomeans`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Rows in post-order, [`OVERALL`] last
    pub rows: Vec<GeomeanRow>,
    /// Mean of every benchmark, in tree order
    pub means: Vec<f64>,
    /// Population stdev of every benchmark, aligned with `means`
    pub stdevs: Vec<f64>,
}

impl Aggregation {
    fn absorb(&mut self, child: Aggregation) {
        self.rows.extend(child.rows);
        self.means.extend(child.means);
        self.stdevs.extend(child.stdevs);
    }
}

/// Aggregate `tree` into geomean rows.
///
/// With `include_leaf_geomeans`, every benchmark also gets a row of its own.
/// Groups without benchmarks and benchmarks without samples produce no row.
pub fn aggregate_geomeans(tree: &Group, include_leaf_geomeans: bool) -> Aggregation {
    let mut total = aggregate_children(tree, "", 0, include_leaf_geomeans);

    if !total.means.is_empty() {
        let record = GeomeanRecord::from_means(&total.means, &total.stdevs);
        total.rows.push(GeomeanRow {
            name: OVERALL.to_string(),
            depth: 0,
            count: total.means.len(),
            record,
        });
    }
    total
}

fn aggregate_children(group: &Group, prefix: &str, depth: usize, leaf_rows: bool) -> Aggregation {
    let mut out = Aggregation::default();
    for (name, node) in group.iter() {
        let path = join_path(prefix, name);
        out.absorb(aggregate_node(node, path, depth, leaf_rows));
    }
    out
}

fn aggregate_node(node: &Node, path: String, depth: usize, leaf_rows: bool) -> Aggregation {
    match node {
        Node::Leaf(samples) if samples.is_empty() => {
            debug!(benchmark = %path, "Skipping benchmark without samples");
            Aggregation::default()
        }
        Node::Leaf(samples) => {
            let stats = compute_leaf_stats(samples);
            let mut rows = Vec::new();
            if leaf_rows {
                let geomean = calc_geomean(samples);
                let error = calc_geomean_error(&[stats.mean], &[stats.std_dev], geomean);
                rows.push(GeomeanRow {
                    name: path,
                    depth,
                    count: 1,
                    record: GeomeanRecord {
                        geomean,
                        error,
                        error_percent: ratio_percent(error, geomean),
                    },
                });
            }
            Aggregation {
                rows,
                means: vec![stats.mean],
                stdevs: vec![stats.std_dev],
            }
        }
        Node::Group(group) => {
            let mut out = aggregate_children(group, &path, depth + 1, leaf_rows);
            if out.means.is_empty() {
                debug!(group = %path, "Skipping group without benchmarks");
                return out;
            }
            out.rows.push(GeomeanRow {
                name: path,
                depth,
                count: out.means.len(),
                record: GeomeanRecord::from_means(&out.means, &out.stdevs),
            });
            out
        }
    }
}
