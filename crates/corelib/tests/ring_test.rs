//! Comprehensive tests for the hash ring implementation.
//!
//! # Test Strategy
//!
//! 1. **Basic functionality**: Empty ring, add/lookup, remove
//! 2. **Multiple nodes**: Distribution, consistency
//! 3. **Edge cases**: Wraparound, single node, collisions
//! 4. **Topology changes**: minimal disruption on add and remove

use std::collections::HashMap;
use std::sync::Arc;

use corelib::coordinate::Coordinate;
use corelib::partitioner::Partitioner;
use corelib::ring::{HashRing, RingBuilder};
use corelib::{Error, NodeId};

/// Partitioner with hand-picked coordinates.
///
/// Keys listed in the table map to their entry; any other key must be a
/// decimal number and maps to that coordinate.
#[derive(Debug, Default)]
struct TablePartitioner {
    table: HashMap<&'static str, u32>,
}

impl TablePartitioner {
    fn new(entries: &[(&'static str, u32)]) -> Arc<Self> {
        Arc::new(Self {
            table: entries.iter().copied().collect(),
        })
    }
}

impl Partitioner for TablePartitioner {
    fn coordinate(&self, key: &[u8]) -> Coordinate {
        let key = std::str::from_utf8(key).unwrap();
        match self.table.get(key) {
            Some(c) => Coordinate(*c),
            None => Coordinate(key.parse().unwrap()),
        }
    }

    fn name(&self) -> &'static str {
        "TablePartitioner"
    }
}

fn ring_of(nodes: &[&str], vnodes: usize) -> HashRing {
    RingBuilder::new()
        .with_vnodes(vnodes)
        .add_nodes(nodes.iter().copied())
        .build()
        .unwrap()
}

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("user:{i:08}")).collect()
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_ring_lookup() {
    let ring = HashRing::new();
    assert_eq!(ring.lookup(b"key1"), Err(Error::EmptyRing));
    assert_eq!(ring.node_count(), 0);
    assert_eq!(ring.vnode_count(), 0);
    assert_eq!(ring.snapshot().lookup(b"key1"), Err(Error::EmptyRing));
}

#[test]
fn test_add_node_and_lookup() {
    let mut ring = HashRing::new();
    ring.add_node("node1", 4).unwrap();

    assert_eq!(ring.node_count(), 1);
    assert_eq!(ring.vnode_count(), 4);
    assert_eq!(ring.lookup(b"test-key").unwrap(), "node1");
    assert!(ring.contains_node("node1"));
}

#[test]
fn test_remove_node() {
    let mut ring = HashRing::new();
    ring.add_node("node1", 4).unwrap();
    ring.add_node("node2", 4).unwrap();
    assert_eq!(ring.vnode_count(), 8);

    ring.remove_node("node1").unwrap();

    assert_eq!(ring.node_count(), 1);
    assert_eq!(ring.vnode_count(), 4);
    assert_eq!(ring.lookup(b"some-key").unwrap(), "node2");
    assert!(!ring.contains_node("node1"));
}

#[test]
fn test_remove_missing_node() {
    let mut ring = ring_of(&["a", "b"], 8);
    assert_eq!(
        ring.remove_node("ghost"),
        Err(Error::NodeNotFound(NodeId::from("ghost")))
    );
    assert_eq!(ring.node_count(), 2);
}

#[test]
fn test_duplicate_add_is_rejected() {
    let mut ring = HashRing::new();
    ring.add_node("node1", 4).unwrap();
    assert_eq!(
        ring.add_node("node1", 4),
        Err(Error::DuplicateNode(NodeId::from("node1")))
    );
    assert_eq!(ring.vnode_count(), 4);
}

// ============================================================================
// Multiple Nodes Tests
// ============================================================================

#[test]
fn test_total_coverage() {
    let ring = ring_of(&["node1", "node2", "node3"], 16);
    assert_eq!(ring.vnode_count(), 48);

    let nodes: Vec<NodeId> = ring.nodes().cloned().collect();
    for key in keys(2_000) {
        assert!(nodes.contains(ring.lookup(&key).unwrap()));
    }
}

#[test]
fn test_independent_rings_agree() {
    let a = ring_of(&["node1", "node2", "node3"], 64);
    let b = ring_of(&["node1", "node2", "node3"], 64);

    assert_eq!(a.snapshot(), b.snapshot());
    for key in keys(2_000) {
        assert_eq!(a.lookup(&key).unwrap(), b.lookup(&key).unwrap());
        assert_eq!(a.lookup(&key).unwrap(), a.lookup(&key).unwrap());
    }
}

// ============================================================================
// Ring Builder Tests
// ============================================================================

#[test]
fn test_ring_builder_default() {
    let ring = RingBuilder::new()
        .add_node("node1")
        .add_node("node2")
        .build()
        .unwrap();

    assert_eq!(ring.node_count(), 2);
    // Default is 100 vnodes per node
    assert_eq!(ring.vnode_count(), 200);
    assert_eq!(ring.partitioner_name(), "Sha1Partitioner");
}

#[test]
fn test_ring_builder_mixed_vnodes() {
    let ring = RingBuilder::new()
        .with_vnodes(4)
        .add_node("node1")
        .add_node_with_vnodes("node2", 8)
        .build()
        .unwrap();

    assert_eq!(ring.node_count(), 2);
    assert_eq!(ring.vnode_count(), 12);
    assert_eq!(ring.coordinates_of("node2").unwrap().len(), 8);
}

#[test]
fn test_ring_builder_rejects_duplicates() {
    let result = RingBuilder::new().add_node("a").add_node("a").build();
    assert_eq!(result.unwrap_err(), Error::DuplicateNode(NodeId::from("a")));
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_single_node() {
    let ring = ring_of(&["node1"], 4);
    for key in ["key1", "key2", "key3", "very-long-key-name"] {
        assert_eq!(ring.lookup(key).unwrap(), "node1");
    }
}

#[test]
fn test_wraparound_to_smallest_coordinate() {
    let partitioner = TablePartitioner::new(&[("a#vn0", 100), ("b#vn0", 200)]);
    let mut ring = HashRing::with_partitioner(partitioner);
    ring.add_node("a", 1).unwrap();
    ring.add_node("b", 1).unwrap();

    assert_eq!(ring.lookup("50").unwrap(), "a");
    assert_eq!(ring.lookup("100").unwrap(), "a");
    assert_eq!(ring.lookup("101").unwrap(), "b");
    assert_eq!(ring.lookup("200").unwrap(), "b");
    // Past every coordinate: wraps to the smallest one.
    assert_eq!(ring.lookup("201").unwrap(), "a");
    assert_eq!(ring.lookup(u32::MAX.to_string()).unwrap(), "a");
    assert_eq!(ring.snapshot().lookup("4000000000").unwrap(), "a");
}

#[test]
fn test_collision_first_insertion_wins() {
    let partitioner = TablePartitioner::new(&[("a#vn0", 100), ("b#vn0", 100), ("b#vn0@1", 300)]);
    let mut ring = HashRing::with_partitioner(partitioner);
    ring.add_node("a", 1).unwrap();
    ring.add_node("b", 1).unwrap();

    assert_eq!(ring.coordinates_of("a").unwrap(), &[Coordinate(100)]);
    assert_eq!(ring.coordinates_of("b").unwrap(), &[Coordinate(300)]);
    assert_eq!(ring.lookup("250").unwrap(), "b");
}

#[test]
fn test_collision_between_own_replicas() {
    let partitioner = TablePartitioner::new(&[("a#vn0", 10), ("a#vn1", 10), ("a#vn1@1", 20)]);
    let mut ring = HashRing::with_partitioner(partitioner);
    ring.add_node("a", 2).unwrap();
    assert_eq!(
        ring.coordinates_of("a").unwrap(),
        &[Coordinate(10), Coordinate(20)]
    );
}

#[test]
fn test_unresolvable_collision_leaves_ring_unchanged() {
    let mut table = vec![("a#vn0", 7)];
    let probes: Vec<&'static str> = (0..=corelib::vnode::MAX_PROBES)
        .map(|attempt| {
            let label = if attempt == 0 {
                "b#vn1".to_string()
            } else {
                format!("b#vn1@{attempt}")
            };
            let leaked: &'static str = Box::leak(label.into_boxed_str());
            leaked
        })
        .collect();
    table.push(("b#vn0", 9));
    table.extend(probes.iter().map(|label| (*label, 7)));

    let mut ring = HashRing::with_partitioner(TablePartitioner::new(&table));
    ring.add_node("a", 1).unwrap();
    let before = ring.snapshot();

    let err = ring.add_node("b", 2).unwrap_err();
    assert!(matches!(err, Error::CoordinateCollision { replica: 1, .. }));
    assert_eq!(ring.snapshot(), before);
    assert!(!ring.contains_node("b"));
}

// ============================================================================
// Topology Changes
// ============================================================================

#[test]
fn test_removal_only_moves_removed_nodes_keys() {
    let mut ring = ring_of(&["a", "b", "c", "d", "e"], 50);
    let population = keys(10_000);
    let before: Vec<NodeId> = population
        .iter()
        .map(|k| ring.lookup(k).unwrap().clone())
        .collect();

    ring.remove_node("c").unwrap();

    for (key, old) in population.iter().zip(&before) {
        let new = ring.lookup(key).unwrap();
        if old != "c" {
            assert_eq!(new, old, "key {key} moved although its owner stayed");
        } else {
            assert_ne!(new, "c");
        }
    }
}

#[test]
fn test_addition_only_moves_keys_to_new_node() {
    let mut ring = ring_of(&["a", "b", "c"], 50);
    let population = keys(10_000);
    let before: Vec<NodeId> = population
        .iter()
        .map(|k| ring.lookup(k).unwrap().clone())
        .collect();

    ring.add_node("d", 50).unwrap();

    for (key, old) in population.iter().zip(&before) {
        let new = ring.lookup(key).unwrap();
        assert!(new == old || new == "d", "key {key} moved between old nodes");
    }
}

#[test]
fn test_add_then_remove_restores_snapshot() {
    let mut ring = ring_of(&["A", "B", "C"], 100);
    let original = ring.snapshot();

    ring.add_node("D", 100).unwrap();
    assert_ne!(ring.snapshot(), original);
    ring.remove_node("D").unwrap();

    assert_eq!(ring.snapshot(), original);
    for key in keys(5_000) {
        assert_eq!(ring.lookup(&key).unwrap(), original.lookup(&key).unwrap());
    }
}

#[test]
fn test_readd_after_remove() {
    let mut ring = ring_of(&["a", "b"], 4);
    let original = ring.snapshot();
    ring.remove_node("a").unwrap();
    ring.add_node("a", 4).unwrap();
    assert_eq!(ring.snapshot(), original);
}
