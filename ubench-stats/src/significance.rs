//! Significance Testing
//!
//! Paired significance tests between two runs of the same benchmark: the
//! Wilcoxon signed-rank test and the paired Student t-test.
//!
//! The tests are reached through [`SignificanceTestProvider`] so that a
//! comparison can run without a statistical backend at all. The provider is
//! chosen once (see [`SignificanceBackend`]) and passed down explicitly.
//!
//! **Pairing is positional.** Run `i` of the first sequence is paired with run
//! `i` of the second; sequences are never sorted before testing.
//!
//! A p-value is NaN whenever the test cannot be computed: mismatched lengths,
//! too few usable pairs, or paired differences without any dispersion.

use crate::distributions::{normal_two_sided_p, student_t_two_sided_p};
use serde::{Deserialize, Serialize};

/// Below this many samples per side, p-values are low confidence
pub const MIN_SIGNIFICANCE_SAMPLES: usize = 10;

/// Largest number of non-zero differences for which the exact Wilcoxon null
/// distribution is used
const WILCOXON_EXACT_MAX_PAIRS: usize = 50;

/// p-values of the two paired tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Significance {
    /// Wilcoxon signed-rank p-value, NaN if undefined
    pub wilcoxon_p: f64,
    /// Paired t-test p-value, NaN if undefined
    pub ttest_p: f64,
}

impl Significance {
    /// Both p-values undefined
    pub const UNDEFINED: Significance = Significance {
        wilcoxon_p: f64::NAN,
        ttest_p: f64::NAN,
    };

    /// Whether both tests reject the null hypothesis at their thresholds.
    ///
    /// Undefined p-values never count as significant.
    pub fn is_significant(&self, wilcoxon_threshold: f64, ttest_threshold: f64) -> bool {
        self.wilcoxon_p < wilcoxon_threshold && self.ttest_p < ttest_threshold
    }

    /// Whether at least one of the p-values was computed
    pub fn is_defined(&self) -> bool {
        !self.wilcoxon_p.is_nan() || !self.ttest_p.is_nan()
    }
}

impl Default for Significance {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

/// Whether a pair of sequences is too short for trustworthy p-values
pub fn is_low_confidence(a: &[f64], b: &[f64]) -> bool {
    a.len() < MIN_SIGNIFICANCE_SAMPLES || b.len() < MIN_SIGNIFICANCE_SAMPLES
}

/// Capability computing paired significance tests
pub trait SignificanceTestProvider: std::fmt::Debug + Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this provider produces real p-values.
    ///
    /// Output layers use this to drop p-value columns entirely.
    fn is_available(&self) -> bool {
        true
    }

    /// Run both tests on positionally paired samples
    fn test(&self, a: &[f64], b: &[f64]) -> Significance;
}

/// Built-in implementation of both tests
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSignificance;

impl SignificanceTestProvider for BuiltinSignificance {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn test(&self, a: &[f64], b: &[f64]) -> Significance {
        Significance {
            wilcoxon_p: wilcoxon_signed_rank(a, b),
            ttest_p: paired_t_test(a, b),
        }
    }
}

/// Null provider: values-only comparisons without significance
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignificance;

impl SignificanceTestProvider for NoSignificance {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn test(&self, _a: &[f64], _b: &[f64]) -> Significance {
        Significance::UNDEFINED
    }
}

/// Selection of the significance provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignificanceBackend {
    /// Built-in Wilcoxon and paired t-test
    #[default]
    Builtin,
    /// No significance testing
    None,
}

impl SignificanceBackend {
    /// Instantiate the provider for this backend
    pub fn provider(self) -> Box<dyn SignificanceTestProvider> {
        match self {
            SignificanceBackend::Builtin => Box::new(BuiltinSignificance),
            SignificanceBackend::None => Box::new(NoSignificance),
        }
    }
}

impl std::str::FromStr for SignificanceBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "builtin" => Ok(SignificanceBackend::Builtin),
            "none" | "off" => Ok(SignificanceBackend::None),
            other => Err(format!("Unknown significance backend: {}", other)),
        }
    }
}

/// Positional differences `a[i] - b[i]`, or `None` if the lengths differ or
/// the differences are all identical.
fn paired_differences(a: &[f64], b: &[f64]) -> Option<Vec<f64>> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let diffs: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    let first = diffs[0];
    if diffs.iter().all(|d| *d == first) {
        return None;
    }
    Some(diffs)
}

/// Two-sided Wilcoxon signed-rank test.
///
/// Zero differences are dropped before ranking. The exact null distribution is
/// used for small samples without ties, the tie-corrected normal approximation
/// otherwise.
pub fn wilcoxon_signed_rank(a: &[f64], b: &[f64]) -> f64 {
    let Some(diffs) = paired_differences(a, b) else {
        return f64::NAN;
    };

    let nonzero: Vec<f64> = diffs.into_iter().filter(|d| *d != 0.0).collect();
    let n = nonzero.len();
    if n == 0 {
        return f64::NAN;
    }

    let magnitudes: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
    let (ranks, tie_groups) = average_ranks(&magnitudes);

    let r_plus: f64 = nonzero
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let total = (n * (n + 1)) as f64 / 2.0;
    let statistic = r_plus.min(total - r_plus);

    if n <= WILCOXON_EXACT_MAX_PAIRS && tie_groups.is_empty() {
        return wilcoxon_exact_p(statistic, n);
    }

    let mean = total / 2.0;
    let tie_correction: f64 = tie_groups
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum::<f64>()
        / 48.0;
    let n_f = n as f64;
    let variance = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_correction;
    if variance <= 0.0 {
        return f64::NAN;
    }

    normal_two_sided_p((statistic - mean) / variance.sqrt())
}

/// Exact two-sided p-value for the signed-rank statistic `statistic` over
/// `n` untied ranks.
fn wilcoxon_exact_p(statistic: f64, n: usize) -> f64 {
    let max_sum = n * (n + 1) / 2;

    // counts[s] = number of sign assignments whose positive ranks sum to s
    let mut counts = vec![0.0_f64; max_sum + 1];
    counts[0] = 1.0;
    for rank in 1..=n {
        for s in (rank..=max_sum).rev() {
            counts[s] += counts[s - rank];
        }
    }

    let threshold = statistic.floor() as usize;
    let tail: f64 = counts[..=threshold.min(max_sum)].iter().sum();
    let total = 2.0_f64.powi(n as i32);

    (2.0 * tail / total).min(1.0)
}

/// Average (mid) ranks of `values`, 1-based, plus the size of every tie group.
fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_groups = Vec::new();

    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }

        // Positions start..end share ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        if end - start > 1 {
            tie_groups.push(end - start);
        }
        start = end;
    }

    (ranks, tie_groups)
}

/// Two-sided paired Student t-test
pub fn paired_t_test(a: &[f64], b: &[f64]) -> f64 {
    let Some(diffs) = paired_differences(a, b) else {
        return f64::NAN;
    };
    if diffs.len() < 2 {
        return f64::NAN;
    }

    let n = diffs.len() as f64;
    let mean = diffs.iter().sum::<f64>() / n;
    let variance = diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / (n - 1.0);
    if variance.is_nan() || variance <= 0.0 {
        return f64::NAN;
    }

    let t = mean / (variance / n).sqrt();
    student_t_two_sided_p(t, n - 1.0)
}
