//! BLAKE3 partitioner.

use crate::coordinate::Coordinate;
use crate::partitioner::leading_u32;
use crate::partitioner::traits::Partitioner;

/// BLAKE3 digest truncated to its first 32 bits (big-endian).
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Partitioner;

impl Partitioner for Blake3Partitioner {
    fn coordinate(&self, key: &[u8]) -> Coordinate {
        let hash = blake3::hash(key);
        Coordinate(leading_u32(hash.as_bytes()))
    }

    fn name(&self) -> &'static str {
        "Blake3Partitioner"
    }
}
