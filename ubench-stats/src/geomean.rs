//! Geometric Mean and Error Propagation
//!
//! The geomean is computed in log space so that products of many timings do not
//! overflow or underflow.
//!
//! The propagated error is a first-order approximation for a geometric mean of
//! independent measurements:
//!
//! ```text
//! error = sqrt(sum((stdev_i / mean_i)^2)) * geomean / k
//! ```
//!
//! where `k` is the number of values at the level being reported. The division
//! by `k` (rather than `sqrt(k)`) is kept as-is so results stay comparable with
//! historical reports.

use crate::summary::ratio_percent;
use serde::{Deserialize, Serialize};

/// Geometric mean of a set of benchmark means, with its propagated error
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeomeanRecord {
    pub geomean: f64,
    pub error: f64,
    /// `100 * error / geomean`
    pub error_percent: f64,
}

impl GeomeanRecord {
    /// Geomean and propagated error of `means` with per-value `stdevs`.
    ///
    /// # Panics
    ///
    /// Panics if `means` is empty or the slices differ in length.
    pub fn from_means(means: &[f64], stdevs: &[f64]) -> Self {
        let geomean = calc_geomean(means);
        let error = calc_geomean_error(means, stdevs, geomean);
        Self::new(geomean, error)
    }

    /// Ratio `geomean(means2) / geomean(means1)` with the error combined across
    /// both sides.
    ///
    /// # Panics
    ///
    /// Panics if either side is empty or the four slices differ in length.
    pub fn ratio(means1: &[f64], stdevs1: &[f64], means2: &[f64], stdevs2: &[f64]) -> Self {
        let ratio = calc_geomean(means2) / calc_geomean(means1);
        let error = calc_geomean_relation_error(means1, means2, stdevs1, stdevs2, ratio);
        Self::new(ratio, error)
    }

    fn new(geomean: f64, error: f64) -> Self {
        Self {
            geomean,
            error,
            error_percent: ratio_percent(error, geomean),
        }
    }
}

/// Geometric mean via `exp(mean(ln x))`.
///
/// # Panics
///
/// Panics on an empty slice: a geomean of nothing is a caller bug.
pub fn calc_geomean(values: &[f64]) -> f64 {
    assert!(!values.is_empty(), "geomean of an empty set of values");
    let log_sum: f64 = values.iter().map(|x| x.ln()).sum();
    (log_sum / values.len() as f64).exp()
}

/// Propagated error of a geomean over `means`, normalised by `means.len()`.
pub fn calc_geomean_error(means: &[f64], stdevs: &[f64], geomean: f64) -> f64 {
    propagate_error(means, stdevs, geomean, means.len())
}

/// Propagated error of the ratio of two geomeans.
///
/// The relative errors of both sides are summed, and the result is normalised
/// by the number of values on one side.
pub fn calc_geomean_relation_error(
    means1: &[f64],
    means2: &[f64],
    stdevs1: &[f64],
    stdevs2: &[f64],
    ratio: f64,
) -> f64 {
    assert!(
        means1.len() == means2.len() && means1.len() == stdevs1.len() && means1.len() == stdevs2.len(),
        "geomean ratio needs the same number of values on both sides"
    );
    let means: Vec<f64> = means1.iter().chain(means2).copied().collect();
    let stdevs: Vec<f64> = stdevs1.iter().chain(stdevs2).copied().collect();
    propagate_error(&means, &stdevs, ratio, means1.len())
}

fn propagate_error(means: &[f64], stdevs: &[f64], geomean: f64, k: usize) -> f64 {
    assert_eq!(means.len(), stdevs.len(), "one stdev per mean");
    assert!(k != 0, "error of an empty set of values");
    let sum_sq: f64 = means
        .iter()
        .zip(stdevs)
        .map(|(m, s)| (s / m).powi(2))
        .sum();
    sum_sq.sqrt() * geomean / k as f64
}
