//! xxh3 partitioner.

use xxhash_rust::xxh3::xxh3_64;

use crate::coordinate::Coordinate;
use crate::partitioner::traits::Partitioner;

/// 64-bit xxh3 keeping the low 32 bits. Much cheaper than the digests and
/// still well distributed in the low word.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Partitioner for Xxh3Partitioner {
    fn coordinate(&self, key: &[u8]) -> Coordinate {
        Coordinate(xxh3_64(key) as u32)
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}
