//! Ring configuration.

use serde::{Deserialize, Serialize};

use crate::partitioner::PartitionerKind;
use crate::ring::{RingBuilder, DEFAULT_VNODES};

/// Settings shared by every node added through [`RingConfig::builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Virtual nodes per physical node (K).
    pub vnodes_per_node: usize,
    /// Coordinate function used for keys and vnode placement.
    pub partitioner: PartitionerKind,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            vnodes_per_node: DEFAULT_VNODES,
            partitioner: PartitionerKind::default(),
        }
    }
}

impl RingConfig {
    pub fn builder(&self) -> RingBuilder {
        RingBuilder::new()
            .with_partitioner_kind(self.partitioner)
            .with_vnodes(self.vnodes_per_node)
    }
}
