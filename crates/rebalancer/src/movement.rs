//! Key movement between two ring states.

use std::collections::BTreeMap;

use corelib::{NodeId, RingSnapshot};
use serde::Serialize;
use tracing::debug;

use crate::error::{RebalanceError, Result};

/// Moved and total key counts between two ring states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Movement {
    pub moved: usize,
    pub total: usize,
}

impl Movement {
    /// Fraction of keys that changed owner; `0.0` for an empty population.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.moved as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }
}

/// Movement measured on a sample of an unbounded key space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovementEstimate {
    pub movement: Movement,
    /// Estimated fraction of the whole key space that moves.
    pub fraction: f64,
    /// Binomial standard error of `fraction`.
    pub std_error: f64,
}

impl MovementEstimate {
    /// `fraction ± z * std_error`, clamped to `[0, 1]`.
    pub fn interval(&self, z: f64) -> (f64, f64) {
        let half = z * self.std_error;
        ((self.fraction - half).max(0.0), (self.fraction + half).min(1.0))
    }
}

/// A key whose owner differs between two ring states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration<K> {
    pub key: K,
    pub from: NodeId,
    pub to: NodeId,
}

/// Exhaustively compare owners of `keys` under `old` and `new`.
pub fn key_movement<I, K>(old: &RingSnapshot, new: &RingSnapshot, keys: I) -> Result<Movement>
where
    I: IntoIterator<Item = K>,
    K: AsRef<[u8]>,
{
    let mut movement = Movement::default();
    for key in keys {
        let key = key.as_ref();
        movement.total += 1;
        if old.lookup(key)? != new.lookup(key)? {
            movement.moved += 1;
        }
    }
    debug!(moved = movement.moved, total = movement.total, "measured key movement");
    Ok(movement)
}

/// Estimate the moved fraction from the first `sample_size` keys of
/// `population`, which may be unbounded.
///
/// The caller interprets the sampling error; `std_error` is
/// `sqrt(p * (1 - p) / n)` for the `n` keys actually drawn.
pub fn estimate_movement<I, K>(
    old: &RingSnapshot,
    new: &RingSnapshot,
    population: I,
    sample_size: usize,
) -> Result<MovementEstimate>
where
    I: IntoIterator<Item = K>,
    K: AsRef<[u8]>,
{
    let movement = key_movement(old, new, population.into_iter().take(sample_size))?;
    if movement.total == 0 {
        return Err(RebalanceError::EmptySample);
    }
    let p = movement.fraction();
    Ok(MovementEstimate {
        movement,
        fraction: p,
        std_error: (p * (1.0 - p) / movement.total as f64).sqrt(),
    })
}

/// Every key in `keys` whose owner differs between `old` and `new`.
pub fn migrations<I, K>(old: &RingSnapshot, new: &RingSnapshot, keys: I) -> Result<Vec<Migration<K>>>
where
    I: IntoIterator<Item = K>,
    K: AsRef<[u8]>,
{
    let mut out = Vec::new();
    for key in keys {
        let from = old.lookup(&key)?;
        let to = new.lookup(&key)?;
        if from != to {
            let (from, to) = (from.clone(), to.clone());
            out.push(Migration { key, from, to });
        }
    }
    Ok(out)
}

/// Expected moved fraction when one node joins and the ring then holds
/// `nodes_after` equally weighted nodes.
pub fn expected_move_fraction_add(nodes_after: usize) -> f64 {
    if nodes_after == 0 {
        0.0
    } else {
        1.0 / nodes_after as f64
    }
}

/// Recorded owner of every key in a population at one point in time.
///
/// Capturing before and after a topology change lets the two states be
/// compared after the ring itself has moved on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyAssignment {
    owners: BTreeMap<String, NodeId>,
}

impl KeyAssignment {
    pub fn capture<I, K>(snapshot: &RingSnapshot, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut owners = BTreeMap::new();
        for key in keys {
            let key = key.as_ref();
            owners.insert(key.to_owned(), snapshot.lookup(key)?.clone());
        }
        Ok(Self { owners })
    }

    /// Movement from `self` to `after`; both must cover the same keys.
    pub fn movement(&self, after: &KeyAssignment) -> Result<Movement> {
        if !self.owners.keys().eq(after.owners.keys()) {
            return Err(RebalanceError::KeySetMismatch {
                before: self.owners.len(),
                after: after.owners.len(),
            });
        }
        let moved = self
            .owners
            .values()
            .zip(after.owners.values())
            .filter(|(before, after)| before != after)
            .count();
        Ok(Movement {
            moved,
            total: self.owners.len(),
        })
    }

    pub fn owner(&self, key: &str) -> Option<&NodeId> {
        self.owners.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeId)> + '_ {
        self.owners.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
