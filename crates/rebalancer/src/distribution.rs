//! Per-node key counts.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::thread;

use corelib::{NodeId, RingSnapshot};
use serde::Serialize;
use tracing::debug;

use crate::error::{RebalanceError, Result};

/// Number of keys owned by each physical node.
///
/// Every node on the ring is present, including nodes that own no key from
/// the population, so statistics see the true spread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LoadDistribution {
    counts: BTreeMap<NodeId, u64>,
}

impl LoadDistribution {
    /// Zero counts for every node in `nodes`.
    pub fn for_nodes<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = NodeId>,
    {
        Self {
            counts: nodes.into_iter().map(|node| (node, 0)).collect(),
        }
    }

    pub fn record(&mut self, node: &NodeId) {
        match self.counts.get_mut(node) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(node.clone(), 1);
            }
        }
    }

    /// Add `other`'s counts into `self`.
    pub fn merge(&mut self, other: LoadDistribution) {
        for (node, count) in other.counts {
            *self.counts.entry(node).or_insert(0) += count;
        }
    }

    pub fn get(&self, node: &str) -> u64 {
        self.counts.get(node).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, u64)> + '_ {
        self.counts.iter().map(|(node, count)| (node, *count))
    }

    pub fn counts(&self) -> impl Iterator<Item = u64> + '_ {
        self.counts.values().copied()
    }

    /// Total keys counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Tally the owner of every key in `keys` under `ring`.
pub fn load_distribution<I, K>(ring: &RingSnapshot, keys: I) -> Result<LoadDistribution>
where
    I: IntoIterator<Item = K>,
    K: AsRef<[u8]>,
{
    let mut load = LoadDistribution::for_nodes(ring.nodes());
    for key in keys {
        load.record(ring.lookup(key)?);
    }
    debug!(nodes = load.len(), keys = load.total(), "computed load distribution");
    Ok(load)
}

/// [`load_distribution`] split across `workers` scoped threads.
///
/// `workers` is clamped to the available parallelism. Produces exactly the
/// same counts as the sequential version.
pub fn load_distribution_parallel<K>(
    ring: &RingSnapshot,
    keys: &[K],
    workers: usize,
) -> Result<LoadDistribution>
where
    K: AsRef<[u8]> + Sync,
{
    let workers = effective_workers(workers);
    let chunk = keys.len().div_ceil(workers).max(1);
    debug!(workers, chunk, keys = keys.len(), "counting load in parallel");

    let joined = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = keys
            .chunks(chunk)
            .map(|part| s.spawn(move |_| load_distribution(ring, part)))
            .collect();
        handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
    })
    .map_err(|_| RebalanceError::WorkerPanicked)?;

    let mut load = LoadDistribution::for_nodes(ring.nodes());
    for partial in joined {
        load.merge(partial.map_err(|_| RebalanceError::WorkerPanicked)??);
    }
    Ok(load)
}

fn effective_workers(requested: usize) -> usize {
    let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    requested.clamp(1, cores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::RingBuilder;

    fn snapshot(nodes: &[&str], vnodes: usize) -> RingSnapshot {
        RingBuilder::new()
            .with_vnodes(vnodes)
            .add_nodes(nodes.iter().copied())
            .build()
            .unwrap()
            .snapshot()
    }

    #[test]
    fn test_counts_cover_every_key() {
        let ring = snapshot(&["a", "b", "c"], 64);
        let keys: Vec<String> = (0..3_000).map(|i| format!("k{i}")).collect();
        let load = load_distribution(&ring, &keys).unwrap();
        assert_eq!(load.total(), 3_000);
        assert_eq!(load.len(), 3);
    }

    #[test]
    fn test_idle_nodes_are_reported() {
        let ring = snapshot(&["a", "b", "c"], 8);
        let load = load_distribution(&ring, ["only-one-key"]).unwrap();
        assert_eq!(load.len(), 3);
        assert_eq!(load.total(), 1);
        assert_eq!(load.counts().filter(|c| *c == 0).count(), 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ring = snapshot(&["a", "b", "c", "d"], 32);
        let keys: Vec<String> = (0..5_001).map(|i| format!("k{i}")).collect();
        let sequential = load_distribution(&ring, &keys).unwrap();
        for workers in [0, 1, 3, 8] {
            assert_eq!(load_distribution_parallel(&ring, &keys, workers).unwrap(), sequential);
        }
    }

    #[test]
    fn test_parallel_on_empty_population() {
        let ring = snapshot(&["a", "b"], 4);
        let load = load_distribution_parallel::<String>(&ring, &[], 4).unwrap();
        assert_eq!(load.total(), 0);
        assert_eq!(load.len(), 2);
    }

    #[test]
    fn test_worker_count_is_bounded_by_cores() {
        let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        assert_eq!(effective_workers(0), 1);
        assert_eq!(effective_workers(1), 1);
        assert_eq!(effective_workers(usize::MAX), cores);
    }

    #[test]
    fn test_parallel_with_one_worker_per_key() {
        let ring = snapshot(&["a", "b", "c", "d", "e"], 50);
        let keys = crate::KeySampler::new(1).keys(200_000);
        let load = load_distribution_parallel(&ring, &keys, keys.len()).unwrap();
        assert_eq!(load.total(), 200_000);
        assert_eq!(load, load_distribution(&ring, &keys).unwrap());
    }
}
