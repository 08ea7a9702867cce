//! A/B Comparison Statistics
//!
//! Compares two sample sequences of the same benchmark: statistics for both
//! sides, the relative change of the means, and paired significance.

use crate::significance::{Significance, SignificanceTestProvider, is_low_confidence};
use crate::summary::{LeafStatistics, compute_leaf_stats, relative_diff};

/// Default p-value threshold for both tests
pub const DEFAULT_P_THRESHOLD: f64 = 0.05;

/// Result of comparing two sample sequences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonResult {
    /// Statistics for the first (baseline) sequence
    pub baseline_stats: LeafStatistics,
    /// Statistics for the second (candidate) sequence
    pub candidate_stats: LeafStatistics,
    /// `100 * (mean2 - mean1) / mean1`, `+inf` when the baseline mean is zero
    pub relative_change: f64,
    /// Paired significance of the difference
    pub significance: Significance,
    /// Either side had fewer samples than needed for trustworthy p-values
    pub low_confidence: bool,
}

/// Thresholds deciding whether a comparison is significant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonConfig {
    /// Wilcoxon p-value must be strictly below this
    pub wilcoxon_threshold: f64,
    /// t-test p-value must be strictly below this
    pub ttest_threshold: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            wilcoxon_threshold: DEFAULT_P_THRESHOLD,
            ttest_threshold: DEFAULT_P_THRESHOLD,
        }
    }
}

impl ComparisonResult {
    /// Both tests agree the change is significant
    pub fn is_significant(&self, config: &ComparisonConfig) -> bool {
        self.significance
            .is_significant(config.wilcoxon_threshold, config.ttest_threshold)
    }
}

/// Compare `baseline` against `candidate`.
///
/// Never fails: undefined quantities surface as `+inf` or NaN in the result.
pub fn compare_samples(
    baseline: &[f64],
    candidate: &[f64],
    provider: &dyn SignificanceTestProvider,
) -> ComparisonResult {
    let baseline_stats = compute_leaf_stats(baseline);
    let candidate_stats = compute_leaf_stats(candidate);

    ComparisonResult {
        baseline_stats,
        candidate_stats,
        relative_change: relative_diff(baseline_stats.mean, candidate_stats.mean),
        significance: provider.test(baseline, candidate),
        low_confidence: is_low_confidence(baseline, candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::significance::{BuiltinSignificance, NoSignificance};

    #[test]
    fn test_compare_zero_variance_shift() {
        let result = compare_samples(&[10.0, 10.0, 10.0], &[20.0, 20.0, 20.0], &BuiltinSignificance);

        assert_eq!(result.baseline_stats.mean, 10.0);
        assert_eq!(result.candidate_stats.mean, 20.0);
        assert_eq!(result.relative_change, 100.0);
        assert_eq!(result.baseline_stats.std_dev_percent, 0.0);
        assert_eq!(result.candidate_stats.std_dev_percent, 0.0);
        assert!(result.significance.wilcoxon_p.is_nan());
        assert!(result.significance.ttest_p.is_nan());
        assert!(result.low_confidence);
        assert!(!result.is_significant(&ComparisonConfig::default()));
    }

    #[test]
    fn test_compare_identical() {
        let samples = [100.0, 102.0, 98.0, 101.0, 99.0, 100.0, 101.0, 99.0, 100.0, 102.0];
        let result = compare_samples(&samples, &samples, &BuiltinSignificance);

        assert_eq!(result.relative_change, 0.0);
        assert!(!result.low_confidence);
        assert!(!result.is_significant(&ComparisonConfig::default()));
    }

    #[test]
    fn test_compare_clear_improvement() {
        let baseline = [200.0, 202.0, 198.0, 201.0, 199.0, 200.5, 201.5, 199.5, 200.2, 198.8];
        let candidate = baseline.map(|x| x / 2.0);
        let result = compare_samples(&baseline, &candidate, &BuiltinSignificance);

        assert!((result.relative_change + 50.0).abs() < 1e-9);
        assert!(result.is_significant(&ComparisonConfig::default()));
    }

    #[test]
    fn test_compare_zero_baseline() {
        let result = compare_samples(&[0.0, 0.0], &[1.0, 1.0], &NoSignificance);
        assert_eq!(result.relative_change, f64::INFINITY);
    }

    #[test]
    fn test_compare_without_backend() {
        let baseline = [200.0, 202.0, 198.0, 201.0, 199.0, 200.5, 201.5, 199.5, 200.2, 198.8];
        let candidate = baseline.map(|x| x / 2.0);
        let result = compare_samples(&baseline, &candidate, &NoSignificance);

        assert!((result.relative_change + 50.0).abs() < 1e-9);
        assert!(!result.significance.is_defined());
        assert!(!result.is_significant(&ComparisonConfig::default()));
    }
}
