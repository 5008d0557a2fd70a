//! Core partitioner trait definitions.

use std::fmt::Debug;

use crate::coordinate::Coordinate;

/// A partitioner converts keys into coordinates on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// coordinate generation without synchronization overhead. Placement quality
/// of virtual nodes depends directly on the uniformity of this function.
pub trait Partitioner: Send + Sync + Debug + 'static {
    /// Maps a key onto the ring.
    fn coordinate(&self, key: &[u8]) -> Coordinate;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
