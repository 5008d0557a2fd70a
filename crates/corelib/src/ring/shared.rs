//! Copy-on-write ring for concurrent readers.
//!
//! Lookups load the current `Arc<HashRing>` without taking a lock. Topology
//! changes are serialized by a writer mutex; each one clones the current ring,
//! applies the change and atomically publishes the result. Readers that
//! loaded the previous ring keep using it until they drop it.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::error::Result;
use crate::node::NodeId;
use crate::ring::{HashRing, RingSnapshot};

/// A [`HashRing`] shared between threads.
#[derive(Debug)]
pub struct SharedRing {
    current: ArcSwap<HashRing>,
    writer: Mutex<()>,
}

impl SharedRing {
    pub fn new(ring: HashRing) -> Self {
        Self {
            current: ArcSwap::from_pointee(ring),
            writer: Mutex::new(()),
        }
    }

    /// The currently published ring.
    pub fn load(&self) -> Arc<HashRing> {
        self.current.load_full()
    }

    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Result<NodeId> {
        self.current.load().lookup(key).cloned()
    }

    pub fn snapshot(&self) -> RingSnapshot {
        self.current.load().snapshot()
    }

    pub fn add_node(&self, node_id: impl Into<NodeId>, vnodes: usize) -> Result<()> {
        let node_id = node_id.into();
        self.update("add", |ring| ring.add_node(node_id, vnodes))
    }

    pub fn remove_node<Q>(&self, node_id: &Q) -> Result<()>
    where
        Q: AsRef<str> + ?Sized,
    {
        self.update("remove", |ring| ring.remove_node(node_id))
    }

    /// Apply `change` to a private copy and publish it on success.
    fn update<F>(&self, op: &'static str, change: F) -> Result<()>
    where
        F: FnOnce(&mut HashRing) -> Result<()>,
    {
        let _guard = self.writer.lock();
        let mut next = HashRing::clone(&self.current.load());
        change(&mut next)?;

        let vnodes = next.vnode_count();
        self.current.store(Arc::new(next));
        metrics::counter!("ring_topology_changes_total", "op" => op).increment(1);
        metrics::gauge!("ring_vnodes").set(vnodes as f64);
        Ok(())
    }
}

impl From<HashRing> for SharedRing {
    fn from(ring: HashRing) -> Self {
        Self::new(ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_readers_keep_old_ring() {
        let shared = SharedRing::new(HashRing::new());
        shared.add_node("a", 8).unwrap();
        let before = shared.load();
        shared.add_node("b", 8).unwrap();

        assert_eq!(before.node_count(), 1);
        assert_eq!(shared.load().node_count(), 2);
    }

    #[test]
    fn test_failed_update_publishes_nothing() {
        let shared = SharedRing::new(HashRing::new());
        shared.add_node("a", 8).unwrap();
        let before = shared.load();

        assert_eq!(shared.add_node("a", 8), Err(Error::DuplicateNode(NodeId::from("a"))));
        assert_eq!(shared.remove_node("a"), Err(Error::EmptyRing));
        assert!(Arc::ptr_eq(&before, &shared.load()));
    }

    #[test]
    fn test_concurrent_lookups_during_topology_changes() {
        let shared = Arc::new(SharedRing::new(HashRing::new()));
        shared.add_node("seed", 16).unwrap();

        std::thread::scope(|s| {
            for _ in 0..4 {
                let shared = Arc::clone(&shared);
                s.spawn(move || {
                    for i in 0..2_000 {
                        let owner = shared.lookup(format!("key-{i}")).unwrap();
                        assert!(owner.as_str().starts_with("seed") || owner.as_str().starts_with("n"));
                    }
                });
            }
            for n in 0..8 {
                shared.add_node(format!("n{n}"), 16).unwrap();
            }
        });

        assert_eq!(shared.load().node_count(), 9);
    }
}
