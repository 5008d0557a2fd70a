//! Error types for the core library.

use crate::node::NodeId;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
///
/// Every ring mutation either applies completely or fails with one of these
/// and leaves the ring untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `add_node` was called with an identifier already on the ring.
    #[error("node {0} already exists in ring")]
    DuplicateNode(NodeId),

    /// A node-scoped operation referenced an identifier not on the ring.
    #[error("node {0} not found in ring")]
    NodeNotFound(NodeId),

    /// Lookup against an empty ring, or a removal that would empty it.
    #[error("ring is empty")]
    EmptyRing,

    /// A node must own at least one virtual node.
    #[error("invalid vnode count {0}: must be at least 1")]
    InvalidVnodeCount(usize),

    /// Every salted re-probe for a virtual node landed on an occupied
    /// coordinate.
    #[error("vnode {replica} of node {node_id} collided on {attempts} probes")]
    CoordinateCollision {
        /// Node whose virtual node could not be placed.
        node_id: NodeId,
        /// Replica index of that virtual node.
        replica: u32,
        /// Number of placements attempted.
        attempts: u32,
    },
}
