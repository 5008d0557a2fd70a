//! Rebalancing analysis for consistent hash rings.
//!
//! Stateless functions over [`RingSnapshot`](corelib::RingSnapshot)s and key
//! populations:
//! - How many keys change owner between two ring states
//! - How many keys each node owns
//! - Descriptive statistics over those per-node loads

pub mod distribution;
pub mod error;
pub mod keys;
pub mod movement;
pub mod stats;

pub use distribution::{load_distribution, load_distribution_parallel, LoadDistribution};
pub use error::{RebalanceError, Result};
pub use keys::KeySampler;
pub use movement::{
    estimate_movement, expected_move_fraction_add, key_movement, migrations, KeyAssignment,
    Migration, Movement, MovementEstimate,
};
pub use stats::{distribution_stats, DistributionStats};
