//! Hash ring data structure.
//!
//! Two indexes are kept in lock-step:
//!
//! - `vnodes`: `BTreeMap<Coordinate, VirtualNode>`, the ring itself, sorted by
//!   coordinate so both insertion and successor search are O(log n)
//! - `placements`: `BTreeMap<NodeId, Vec<Coordinate>>`, every coordinate a
//!   physical node owns, used for clean removal
//!
//! Both maps are ordered so nothing observable depends on hash-map iteration
//! order.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::partitioner::{Partitioner, Sha1Partitioner};
use crate::ring::snapshot::RingSnapshot;
use crate::topology::Topology;
use crate::vnode::{VirtualNode, MAX_PROBES};

/// Consistent hash ring backed by virtual nodes.
///
/// Mutations take `&mut self`; wrap the ring in a
/// [`SharedRing`](crate::ring::SharedRing) to share it between threads.
#[derive(Clone)]
pub struct HashRing {
    partitioner: Arc<dyn Partitioner>,
    vnodes: BTreeMap<Coordinate, VirtualNode>,
    placements: BTreeMap<NodeId, Vec<Coordinate>>,
}

impl HashRing {
    /// Create an empty ring using the default SHA-1 partitioner.
    pub fn new() -> Self {
        Self::with_partitioner(Arc::new(Sha1Partitioner))
    }

    /// Create an empty ring using the given coordinate function.
    pub fn with_partitioner(partitioner: Arc<dyn Partitioner>) -> Self {
        Self {
            partitioner,
            vnodes: BTreeMap::new(),
            placements: BTreeMap::new(),
        }
    }

    /// Add a physical node owning `vnodes` virtual nodes.
    ///
    /// Keys in the arc ending at each new virtual node move to `node_id`;
    /// every other key keeps its owner.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidVnodeCount`] if `vnodes` is zero
    /// - [`Error::DuplicateNode`] if `node_id` is already on the ring
    /// - [`Error::CoordinateCollision`] if a virtual node cannot be placed
    ///
    /// Coordinates are all computed before the ring is touched, so a failed
    /// call leaves the ring unchanged.
    pub fn add_node(&mut self, node_id: impl Into<NodeId>, vnodes: usize) -> Result<()> {
        let node_id = node_id.into();
        let replicas = match u32::try_from(vnodes) {
            Ok(n) if n > 0 => n,
            _ => return Err(Error::InvalidVnodeCount(vnodes)),
        };
        if self.placements.contains_key(&node_id) {
            return Err(Error::DuplicateNode(node_id));
        }

        let mut pending: BTreeMap<Coordinate, VirtualNode> = BTreeMap::new();
        let mut coordinates = Vec::new();

        for replica in 0..replicas {
            let vnode = VirtualNode::new(node_id.clone(), replica);
            let (coordinate, attempt) = vnode
                .place(self.partitioner.as_ref(), |c| {
                    self.vnodes.contains_key(&c) || pending.contains_key(&c)
                })
                .ok_or_else(|| Error::CoordinateCollision {
                    node_id: node_id.clone(),
                    replica,
                    attempts: MAX_PROBES + 1,
                })?;

            if attempt > 0 {
                debug!(%node_id, replica, attempt, %coordinate, "vnode re-probed after collision");
            }
            pending.insert(coordinate, vnode);
            coordinates.push(coordinate);
        }

        self.vnodes.extend(pending);
        self.placements.insert(node_id.clone(), coordinates);
        debug!(%node_id, vnodes, total_vnodes = self.vnodes.len(), "added node to ring");
        Ok(())
    }

    /// Remove a physical node and all of its virtual nodes.
    ///
    /// Keys owned by each removed virtual node fall through to its clockwise
    /// successor.
    ///
    /// # Errors
    ///
    /// - [`Error::NodeNotFound`] if `node_id` is not on the ring
    /// - [`Error::EmptyRing`] if `node_id` is the last node
    pub fn remove_node<Q>(&mut self, node_id: &Q) -> Result<()>
    where
        Q: AsRef<str> + ?Sized,
    {
        let key = node_id.as_ref();
        if !self.placements.contains_key(key) {
            return Err(Error::NodeNotFound(NodeId::new(key)));
        }
        if self.placements.len() == 1 {
            return Err(Error::EmptyRing);
        }

        if let Some((node_id, coordinates)) = self.placements.remove_entry(key) {
            for coordinate in &coordinates {
                self.vnodes.remove(coordinate);
            }
            debug!(%node_id, vnodes = coordinates.len(), total_vnodes = self.vnodes.len(), "removed node from ring");
        }
        Ok(())
    }

    /// Find the physical node responsible for `key`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] if no node has been added.
    #[inline]
    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Result<&NodeId> {
        self.lookup_vnode(key).map(|(_, vnode)| &vnode.node_id)
    }

    /// Find the virtual node responsible for `key`, with its coordinate.
    pub fn lookup_vnode(&self, key: impl AsRef<[u8]>) -> Result<(Coordinate, &VirtualNode)> {
        self.successor(self.partitioner.coordinate(key.as_ref()))
    }

    /// First virtual node at or clockwise after `coordinate`.
    ///
    /// Wraps to the smallest coordinate when `coordinate` is past every
    /// virtual node on the ring.
    pub fn successor(&self, coordinate: Coordinate) -> Result<(Coordinate, &VirtualNode)> {
        self.vnodes
            .range(coordinate..)
            .next()
            .or_else(|| self.vnodes.iter().next())
            .map(|(c, vnode)| (*c, vnode))
            .ok_or(Error::EmptyRing)
    }

    /// Physical node owning `coordinate`.
    pub fn owner_of(&self, coordinate: Coordinate) -> Result<&NodeId> {
        self.successor(coordinate).map(|(_, vnode)| &vnode.node_id)
    }

    /// Immutable, ordered export of the ring for analysis.
    pub fn snapshot(&self) -> RingSnapshot {
        let entries = self
            .vnodes
            .iter()
            .map(|(c, vnode)| (*c, vnode.node_id.clone()))
            .collect();
        RingSnapshot::new(entries, Arc::clone(&self.partitioner))
    }

    /// Fraction of the coordinate space each physical node owns.
    pub fn ownership(&self) -> BTreeMap<NodeId, f64> {
        Topology::of_ring(self).shares()
    }

    /// Coordinates owned by `node_id`, in replica order.
    pub fn coordinates_of<Q>(&self, node_id: &Q) -> Result<&[Coordinate]>
    where
        Q: AsRef<str> + ?Sized,
    {
        let key = node_id.as_ref();
        self.placements
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::NodeNotFound(NodeId::new(key)))
    }

    pub fn contains_node<Q>(&self, node_id: &Q) -> bool
    where
        Q: AsRef<str> + ?Sized,
    {
        self.placements.contains_key(node_id.as_ref())
    }

    /// All physical nodes, sorted.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.placements.keys()
    }

    /// All virtual nodes in coordinate order.
    pub fn vnodes(&self) -> impl Iterator<Item = (Coordinate, &VirtualNode)> + Clone + '_ {
        self.vnodes.iter().map(|(c, vnode)| (*c, vnode))
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.placements.len()
    }

    #[inline]
    pub fn vnode_count(&self) -> usize {
        self.vnodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    pub fn partitioner(&self) -> &Arc<dyn Partitioner> {
        &self.partitioner
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("partitioner", &self.partitioner.name())
            .field("nodes", &self.placements.len())
            .field("vnodes", &self.vnodes.len())
            .finish()
    }
}
