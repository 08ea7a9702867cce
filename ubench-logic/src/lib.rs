#![warn(missing_docs)]
//! ubench Logic - Result Tree Engine
//!
//! Models benchmark results as a tree of named groups and sample leaves, and
//! provides the tree-level operations: glob filtering, geomean aggregation
//! and lock-step comparison of two runs.

mod aggregate;
mod diff;
mod filter;
mod tree;

pub use aggregate::{Aggregation, GeomeanRow, OVERALL, aggregate_geomeans};
pub use diff::{
    DiffEntry, DiffError, DiffOptions, DiffRow, DiffTable, GeomeanDiffRow, TreeDiff, diff_trees,
    order_by_diff,
};
pub use filter::{FilterError, TreeFilter, filter_tree};
pub use tree::{Group, Node, NodeKind, PATH_SEPARATOR, TreeError, join_path};
