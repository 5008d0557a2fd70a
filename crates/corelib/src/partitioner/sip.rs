//! SipHash partitioner.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;

use crate::coordinate::Coordinate;
use crate::partitioner::traits::Partitioner;

/// SipHash-1-3 with fixed zero keys, low 32 bits.
///
/// The keys are fixed so coordinates are stable across processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipPartitioner;

impl Partitioner for SipPartitioner {
    fn coordinate(&self, key: &[u8]) -> Coordinate {
        let mut hasher = SipHasher13::new_with_keys(0, 0);
        hasher.write(key);
        Coordinate(hasher.finish() as u32)
    }

    fn name(&self) -> &'static str {
        "SipPartitioner"
    }
}
