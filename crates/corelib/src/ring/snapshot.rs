//! Read-only ring exports.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, Serializer};

use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::partitioner::Partitioner;

/// Ordered `(Coordinate, NodeId)` export of a ring.
///
/// Snapshots share nothing mutable with the ring they came from; they are
/// cheap to clone and resolve keys with the same successor rule as
/// [`HashRing::lookup`](crate::ring::HashRing::lookup).
#[derive(Clone)]
pub struct RingSnapshot {
    entries: Arc<[(Coordinate, NodeId)]>,
    partitioner: Arc<dyn Partitioner>,
}

impl RingSnapshot {
    /// `entries` must already be sorted by coordinate.
    pub(crate) fn new(entries: Vec<(Coordinate, NodeId)>, partitioner: Arc<dyn Partitioner>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self {
            entries: entries.into(),
            partitioner,
        }
    }

    /// Physical node owning `key` in this snapshot.
    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Result<&NodeId> {
        self.owner_of(self.partitioner.coordinate(key.as_ref()))
    }

    /// Physical node owning `coordinate` in this snapshot.
    pub fn owner_of(&self, coordinate: Coordinate) -> Result<&NodeId> {
        if self.entries.is_empty() {
            return Err(Error::EmptyRing);
        }
        let idx = self.entries.partition_point(|(c, _)| *c < coordinate);
        let idx = if idx == self.entries.len() { 0 } else { idx };
        Ok(&self.entries[idx].1)
    }

    pub fn entries(&self) -> &[(Coordinate, NodeId)] {
        &self.entries
    }

    /// Distinct physical nodes, sorted.
    pub fn nodes(&self) -> BTreeSet<NodeId> {
        self.entries.iter().map(|(_, node)| node.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }
}

impl PartialEq for RingSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for RingSnapshot {}

impl fmt::Debug for RingSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingSnapshot")
            .field("partitioner", &self.partitioner.name())
            .field("vnodes", &self.entries.len())
            .finish()
    }
}

impl Serialize for RingSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}
