//! Coordinate functions for consistent hashing.
//!
//! Partitioners map arbitrary byte keys (and virtual-node labels) onto the
//! 32-bit ring. They are pure: the same bytes yield the same coordinate in
//! every process and every ring instance.

pub mod blake;
pub mod kind;
pub mod sha;
pub mod sip;
pub mod traits;
pub mod xxh3;

pub use blake::Blake3Partitioner;
pub use kind::PartitionerKind;
pub use sha::Sha1Partitioner;
pub use sip::SipPartitioner;
pub use traits::Partitioner;
pub use xxh3::Xxh3Partitioner;

/// Fold the leading four digest bytes into a coordinate, big-endian.
#[inline]
pub(crate) fn leading_u32(digest: &[u8]) -> u32 {
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}
