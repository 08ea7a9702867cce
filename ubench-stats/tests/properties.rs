//! Property tests for the statistics engine
//!
//! Checks the invariants every summary must satisfy for arbitrary positive
//! sample sequences.

use proptest::prelude::*;
use ubench_stats::{
    BuiltinSignificance, GeomeanRecord, SignificanceTestProvider, calc_geomean,
    compute_leaf_stats, relative_diff,
};

fn samples() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.001_f64..1.0e6, 1..64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: min <= median <= max and the mean lies within [min, max]
    #[test]
    fn prop_stats_are_ordered(values in samples()) {
        let stats = compute_leaf_stats(&values);

        prop_assert!(stats.min <= stats.median);
        prop_assert!(stats.median <= stats.max);
        // Summation rounding can push the mean a hair outside the range
        let slack = stats.max * 1e-12;
        prop_assert!(stats.mean >= stats.min - slack);
        prop_assert!(stats.mean <= stats.max + slack);
        prop_assert!(stats.std_dev >= 0.0);
        prop_assert!(stats.mad >= 0.0);
        prop_assert_eq!(stats.sample_count, values.len());
    }

    /// Property: the geomean of one value is that value
    #[test]
    fn prop_geomean_identity(x in 0.001_f64..1.0e9) {
        let g = calc_geomean(&[x]);
        prop_assert!((g - x).abs() <= x * 1e-12);
    }

    /// Property: the geomean does not depend on input order
    #[test]
    fn prop_geomean_commutative(values in samples()) {
        let mut reversed = values.clone();
        reversed.reverse();

        let forward = calc_geomean(&values);
        let backward = calc_geomean(&reversed);
        prop_assert!((forward - backward).abs() <= forward * 1e-9);
    }

    /// Property: the geomean lies between the smallest and largest value
    #[test]
    fn prop_geomean_bounded(values in samples()) {
        let stats = compute_leaf_stats(&values);
        let g = calc_geomean(&values);

        prop_assert!(g >= stats.min * (1.0 - 1e-9));
        prop_assert!(g <= stats.max * (1.0 + 1e-9));
    }

    /// Property: a value compared with itself has no relative difference
    #[test]
    fn prop_relative_diff_of_self_is_zero(x in prop::num::f64::NORMAL) {
        prop_assert_eq!(relative_diff(x, x), 0.0);
    }

    /// Property: the ratio of identical sides is exactly one
    #[test]
    fn prop_geomean_ratio_of_self_is_one(values in samples()) {
        let stdevs = vec![0.0; values.len()];
        let record = GeomeanRecord::ratio(&values, &stdevs, &values, &stdevs);
        prop_assert_eq!(record.geomean, 1.0);
    }

    /// Property: p-values are NaN or within [0, 1]
    #[test]
    fn prop_p_values_in_range(
        pairs in prop::collection::vec((1.0_f64..1000.0, 1.0_f64..1000.0), 0..40)
    ) {
        let (a, b): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let result = BuiltinSignificance.test(&a, &b);

        for p in [result.wilcoxon_p, result.ttest_p] {
            prop_assert!(p.is_nan() || (0.0..=1.0).contains(&p));
        }
    }
}
