//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of placing each physical node on the ring once, each node owns K
//! virtual nodes spread around the ring. This provides:
//!
//! 1. **Better Load Distribution**: more placements = smoother key shares
//! 2. **Gradual Rebalancing**: a joining node takes small arcs from many peers
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(K) entries per physical node
//! - **Lookup**: O(log n) where n = total vnodes
//! - **Rebalancing**: roughly 1/(N+1) of keys move when a node joins
//!
//! # Placement
//!
//! A virtual node is placed at `H("{node_id}#vn{replica}")`. If that
//! coordinate is already taken the label is re-salted as
//! `"{node_id}#vn{replica}@{attempt}"` until a free coordinate is found; the
//! entry that got there first keeps its place.

use std::fmt;

use crate::coordinate::Coordinate;
use crate::node::NodeId;
use crate::partitioner::Partitioner;

/// Maximum number of salted re-probes before a collision is reported.
pub const MAX_PROBES: u32 = 16;

/// A virtual node on the hash ring: one placement of a physical node.
///
/// # Invariants
///
/// - Every `VirtualNode` on a ring sits at a unique coordinate
/// - `(node_id, replica)` pairs are unique on a ring
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// The physical node that owns this virtual node.
    pub node_id: NodeId,
    /// Replica index in `0..K`.
    pub replica: u32,
}

impl VirtualNode {
    #[inline]
    pub fn new(node_id: NodeId, replica: u32) -> Self {
        Self { node_id, replica }
    }

    /// Label hashed for the first placement attempt.
    pub fn label(&self) -> String {
        format!("{}#vn{}", self.node_id, self.replica)
    }

    /// Label hashed for placement attempt `attempt` (0 is the unsalted label).
    pub fn probe_label(&self, attempt: u32) -> String {
        if attempt == 0 {
            self.label()
        } else {
            format!("{}#vn{}@{}", self.node_id, self.replica, attempt)
        }
    }

    /// Find a free coordinate for this virtual node.
    ///
    /// `occupied` reports whether a coordinate is already taken. Returns the
    /// coordinate and the attempt that produced it, or `None` once
    /// [`MAX_PROBES`] re-probes are exhausted.
    pub fn place<F>(&self, partitioner: &dyn Partitioner, occupied: F) -> Option<(Coordinate, u32)>
    where
        F: Fn(Coordinate) -> bool,
    {
        (0..=MAX_PROBES).find_map(|attempt| {
            let coordinate = partitioner.coordinate(self.probe_label(attempt).as_bytes());
            (!occupied(coordinate)).then_some((coordinate, attempt))
        })
    }

    #[inline]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(node={}, replica={})", self.node_id, self.replica)
    }
}
