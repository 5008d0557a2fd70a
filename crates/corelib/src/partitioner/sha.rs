//! SHA-1 partitioner (the default).

use sha1::{Digest, Sha1};

use crate::coordinate::Coordinate;
use crate::partitioner::leading_u32;
use crate::partitioner::traits::Partitioner;

/// SHA-1 digest truncated to its first 32 bits (big-endian).
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha1Partitioner;

impl Partitioner for Sha1Partitioner {
    fn coordinate(&self, key: &[u8]) -> Coordinate {
        let digest = Sha1::digest(key);
        Coordinate(leading_u32(&digest))
    }

    fn name(&self) -> &'static str {
        "Sha1Partitioner"
    }
}
