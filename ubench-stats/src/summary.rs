//! Leaf Statistics
//!
//! Reduces one sequence of benchmark samples to a fixed statistics record.
//! Every statistic is computed from ALL samples: the engine reports spread
//! (MAD, stdev) but never removes outliers.
//!
//! Degenerate ratios (`MAD%` with a zero median, `stdev%` with a zero mean)
//! resolve to `+inf` so that they stay visible in the rendered tables.

use serde::{Deserialize, Serialize};

/// Statistics for one sample sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeafStatistics {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Median absolute deviation about the median
    pub mad: f64,
    /// `100 * mad / median`, `+inf` when the median is zero
    pub mad_percent: f64,
    pub mean: f64,
    /// Population standard deviation (denominator `n`)
    pub std_dev: f64,
    /// `100 * std_dev / mean`, `+inf` when the mean is zero
    pub std_dev_percent: f64,
    pub sample_count: usize,
}

impl LeafStatistics {
    /// Record used for an empty sample sequence: every statistic is NaN.
    pub fn empty() -> Self {
        Self {
            min: f64::NAN,
            max: f64::NAN,
            median: f64::NAN,
            mad: f64::NAN,
            mad_percent: f64::NAN,
            mean: f64::NAN,
            std_dev: f64::NAN,
            std_dev_percent: f64::NAN,
            sample_count: 0,
        }
    }

    /// Whether the record was computed from at least one sample
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}

/// Compute the statistics record for `samples`.
///
/// An empty slice yields [`LeafStatistics::empty`].
pub fn compute_leaf_stats(samples: &[f64]) -> LeafStatistics {
    if samples.is_empty() {
        return LeafStatistics::empty();
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let median = median(samples);
    let deviations: Vec<f64> = samples.iter().map(|x| (x - median).abs()).collect();
    let mad = self::median(&deviations);

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    LeafStatistics {
        min,
        max,
        median,
        mad,
        mad_percent: ratio_percent(mad, median),
        mean,
        std_dev,
        std_dev_percent: ratio_percent(std_dev, mean),
        sample_count: samples.len(),
    }
}

/// Median of `samples`; the mean of the two middle values for even lengths.
///
/// Returns NaN for an empty slice.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// `100 * value / base`, or `+inf` when `base` is zero.
pub fn ratio_percent(value: f64, base: f64) -> f64 {
    if base == 0.0 {
        f64::INFINITY
    } else {
        value / base * 100.0
    }
}

/// Relative difference `100 * (new - old) / old` in percent.
///
/// Undefined (`+inf`) when `old` is zero.
pub fn relative_diff(old: f64, new: f64) -> f64 {
    if old == 0.0 {
        f64::INFINITY
    } else {
        (new - old) / old * 100.0
    }
}
