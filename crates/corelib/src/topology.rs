//! Ownership view over the ring.
//!
//! Each virtual node owns the arc from its predecessor (exclusive) to itself
//! (inclusive). Summing those arcs per physical node gives the share of the
//! coordinate space, and so the expected share of uniformly hashed keys,
//! that each node is responsible for.

use std::collections::BTreeMap;

use crate::coordinate::{Coordinate, RING_SIZE};
use crate::node::NodeId;
use crate::ring::{HashRing, RingSnapshot};

/// Per-node ownership of the coordinate space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    owned: BTreeMap<NodeId, Ownership>,
}

/// Arc length and vnode count owned by one physical node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ownership {
    /// Number of coordinates owned, out of `RING_SIZE`.
    pub span: u64,
    pub vnodes: usize,
}

impl Ownership {
    /// Fraction of the ring owned, in `[0, 1]`.
    pub fn share(&self) -> f64 {
        self.span as f64 / RING_SIZE as f64
    }
}

impl Topology {
    /// Compute ownership from coordinate-ordered `(coordinate, owner)` pairs.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Coordinate, &'a NodeId)>,
        I::IntoIter: Clone,
    {
        let iter = entries.into_iter();
        let mut owned: BTreeMap<NodeId, Ownership> = BTreeMap::new();
        let Some(mut prev) = iter.clone().last().map(|(c, _)| c) else {
            return Self { owned };
        };

        for (coordinate, node_id) in iter {
            let span = match prev.distance_to(&coordinate) {
                // A lone vnode is its own predecessor and owns the whole ring.
                0 => RING_SIZE,
                d => d,
            };
            let entry = owned.entry(node_id.clone()).or_default();
            entry.span += span;
            entry.vnodes += 1;
            prev = coordinate;
        }
        Self { owned }
    }

    pub fn of_ring(ring: &HashRing) -> Self {
        Self::from_entries(ring.vnodes().map(|(c, vnode)| (c, vnode.node_id())))
    }

    pub fn of_snapshot(snapshot: &RingSnapshot) -> Self {
        Self::from_entries(snapshot.entries().iter().map(|(c, node)| (*c, node)))
    }

    pub fn get(&self, node_id: &str) -> Option<&Ownership> {
        self.owned.get(node_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Ownership)> + '_ {
        self.owned.iter()
    }

    /// Ring share per node.
    pub fn shares(&self) -> BTreeMap<NodeId, f64> {
        self.owned
            .iter()
            .map(|(node, ownership)| (node.clone(), ownership.share()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }
}
