#![warn(missing_docs)]
//! ubench Statistical Engine
//!
//! Provides the numerical core used to summarize and compare benchmark runs:
//! - Leaf statistics (min/max, median and MAD, mean and population stdev)
//! - Geometric means with first-order propagated error
//! - Paired significance tests (Wilcoxon signed-rank, paired t-test) behind
//!   a pluggable provider
//! - A/B comparison of two sample sequences

mod comparison;
mod distributions;
mod geomean;
mod significance;
mod summary;

pub use comparison::{ComparisonConfig, ComparisonResult, DEFAULT_P_THRESHOLD, compare_samples};
pub use distributions::{normal_two_sided_p, student_t_two_sided_p};
pub use geomean::{
    GeomeanRecord, calc_geomean, calc_geomean_error, calc_geomean_relation_error,
};
pub use significance::{
    BuiltinSignificance, MIN_SIGNIFICANCE_SAMPLES, NoSignificance, Significance,
    SignificanceBackend, SignificanceTestProvider, is_low_confidence, paired_t_test,
    wilcoxon_signed_rank,
};
pub use summary::{LeafStatistics, compute_leaf_stats, median, ratio_percent, relative_diff};
