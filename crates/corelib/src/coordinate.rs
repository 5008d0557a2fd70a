//! Positions on the 32-bit circular coordinate space.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of the coordinate space in bits.
pub const RING_BITS: u32 = 32;

/// Number of distinct coordinates (`2^RING_BITS`).
pub const RING_SIZE: u64 = 1 << RING_BITS;

/// A position on the hash ring.
///
/// Totally ordered; the successor of [`Coordinate::MAX`] is
/// [`Coordinate::MIN`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coordinate(pub u32);

impl Coordinate {
    /// Start of the ring.
    pub const MIN: Coordinate = Coordinate(0);
    /// End of the ring.
    pub const MAX: Coordinate = Coordinate(u32::MAX);

    /// Clockwise distance from `self` to `other`.
    ///
    /// Returned as `u64` so that a full turn (`RING_SIZE`) fits; the distance
    /// from a coordinate to itself is `0`.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u64 {
        if other.0 >= self.0 {
            u64::from(other.0 - self.0)
        } else {
            RING_SIZE - u64::from(self.0) + u64::from(other.0)
        }
    }
}

impl From<u32> for Coordinate {
    fn from(value: u32) -> Self {
        Coordinate(value)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}
