//! Core library for consistent hashing implementation.
//!
//! This crate provides the fundamental abstractions for consistent hashing:
//! - Coordinates on the 32-bit ring and the partitioners producing them
//! - Node and virtual node abstractions
//! - The hash ring, its snapshots and a copy-on-write shared ring
//! - Ownership (topology) analysis

pub mod config;
pub mod coordinate;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod topology;
pub mod vnode;

pub use config::RingConfig;
pub use coordinate::Coordinate;
pub use error::{Error, Result};
pub use node::NodeId;
pub use partitioner::{Partitioner, PartitionerKind};
pub use ring::{HashRing, Ring, RingBuilder, RingSnapshot, SharedRing};
pub use topology::Topology;
pub use vnode::VirtualNode;
