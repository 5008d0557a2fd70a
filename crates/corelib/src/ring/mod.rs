//! Consistent hash ring implementation.
//!
//! The ring manages virtual-node coordinates and provides efficient lookup
//! operations for finding nodes responsible for keys.

pub mod builder;
pub mod ring;
pub mod shared;
pub mod snapshot;

pub use builder::{RingBuilder, DEFAULT_VNODES};
pub use ring::HashRing;
pub use shared::SharedRing;
pub use snapshot::RingSnapshot;

/// Alias for the main ring type (used by lib.rs).
pub type Ring = HashRing;
