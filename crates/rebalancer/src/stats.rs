//! Descriptive statistics over per-node loads.

use serde::Serialize;

use crate::distribution::LoadDistribution;

/// Spread of key counts across nodes.
///
/// `variance` is the population variance, accumulated with Welford's online
/// algorithm so it stays accurate for large counts and many nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DistributionStats {
    pub nodes: usize,
    pub keys: u64,
    pub mean: f64,
    pub variance: f64,
    pub stddev: f64,
    pub min: u64,
    pub max: u64,
}

impl DistributionStats {
    /// Statistics over arbitrary counts; all zeros when `counts` is empty.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut n = 0usize;
        let mut keys = 0u64;
        let mut mean = 0.0f64;
        let mut m2 = 0.0f64;
        let mut min = u64::MAX;
        let mut max = 0u64;

        for count in counts {
            n += 1;
            keys += count;
            min = min.min(count);
            max = max.max(count);

            let x = count as f64;
            let delta = x - mean;
            mean += delta / n as f64;
            m2 += delta * (x - mean);
        }

        if n == 0 {
            return Self::default();
        }

        let variance = m2 / n as f64;
        Self {
            nodes: n,
            keys,
            mean,
            variance,
            stddev: variance.sqrt(),
            min,
            max,
        }
    }

    /// `stddev / mean`, or `0.0` when the mean is zero.
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.stddev / self.mean
        }
    }

    /// Busiest node relative to the mean (1.0 is perfectly even).
    pub fn peak_to_mean(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.max as f64 / self.mean
        }
    }
}

pub fn distribution_stats(load: &LoadDistribution) -> DistributionStats {
    DistributionStats::from_counts(load.counts())
}
