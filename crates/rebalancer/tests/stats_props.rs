//! Property tests for distribution statistics.

use proptest::prelude::*;
use rebalancer::DistributionStats;

fn two_pass(counts: &[u64]) -> (f64, f64) {
    let n = counts.len() as f64;
    let mean = counts.iter().map(|&c| c as f64).sum::<f64>() / n;
    let variance = counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

proptest! {
    #[test]
    fn welford_matches_two_pass(counts in prop::collection::vec(0u64..1_000_000, 1..300)) {
        let stats = DistributionStats::from_counts(counts.iter().copied());
        let (mean, variance) = two_pass(&counts);

        prop_assert_eq!(stats.nodes, counts.len());
        prop_assert_eq!(stats.keys, counts.iter().sum::<u64>());
        prop_assert_eq!(stats.min, *counts.iter().min().unwrap());
        prop_assert_eq!(stats.max, *counts.iter().max().unwrap());
        prop_assert!((stats.mean - mean).abs() <= 1e-9 * mean.max(1.0));
        prop_assert!((stats.variance - variance).abs() <= 1e-6 * variance.max(1.0));
        prop_assert!(stats.variance >= 0.0);
    }

    #[test]
    fn shifting_counts_keeps_variance(
        counts in prop::collection::vec(0u64..10_000, 2..100),
        offset in 0u64..1_000_000_000,
    ) {
        let base = DistributionStats::from_counts(counts.iter().copied());
        let shifted = DistributionStats::from_counts(counts.iter().map(|c| c + offset));
        prop_assert!((base.variance - shifted.variance).abs() <= 1e-4 * base.variance.max(1.0));
    }
}
