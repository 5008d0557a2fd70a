//! Builder for populating a ring in one step.

use std::sync::Arc;

use crate::error::Result;
use crate::node::NodeId;
use crate::partitioner::{Partitioner, PartitionerKind};
use crate::ring::HashRing;

/// Virtual nodes per physical node when none is specified.
pub const DEFAULT_VNODES: usize = 100;

/// Builds a [`HashRing`] from a list of nodes.
///
/// Nodes are added in the order they were given, which fixes collision
/// tie-breaks and therefore the resulting ring.
#[derive(Debug, Clone)]
pub struct RingBuilder {
    partitioner: Arc<dyn Partitioner>,
    vnodes: usize,
    nodes: Vec<(NodeId, Option<usize>)>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            partitioner: PartitionerKind::default().build(),
            vnodes: DEFAULT_VNODES,
            nodes: Vec::new(),
        }
    }

    pub fn with_partitioner(mut self, partitioner: Arc<dyn Partitioner>) -> Self {
        self.partitioner = partitioner;
        self
    }

    pub fn with_partitioner_kind(self, kind: PartitionerKind) -> Self {
        self.with_partitioner(kind.build())
    }

    /// Default virtual-node count for nodes added with [`Self::add_node`].
    pub fn with_vnodes(mut self, vnodes: usize) -> Self {
        self.vnodes = vnodes;
        self
    }

    pub fn add_node(mut self, node_id: impl Into<NodeId>) -> Self {
        self.nodes.push((node_id.into(), None));
        self
    }

    pub fn add_node_with_vnodes(mut self, node_id: impl Into<NodeId>, vnodes: usize) -> Self {
        self.nodes.push((node_id.into(), Some(vnodes)));
        self
    }

    pub fn add_nodes<I, N>(mut self, node_ids: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeId>,
    {
        self.nodes
            .extend(node_ids.into_iter().map(|id| (id.into(), None)));
        self
    }

    /// Build the ring, failing on the first rejected node.
    pub fn build(self) -> Result<HashRing> {
        let mut ring = HashRing::with_partitioner(self.partitioner);
        for (node_id, vnodes) in self.nodes {
            ring.add_node(node_id, vnodes.unwrap_or(self.vnodes))?;
        }
        Ok(ring)
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
