//! Report sections printed by the driver.

use std::collections::BTreeMap;
use std::fmt;

use corelib::{Coordinate, HashRing, NodeId};
use rebalancer::{distribution_stats, DistributionStats, LoadDistribution, Movement};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum Section {
    Topology(TopologyReport),
    Distribution(DistributionReport),
    Movement(MovementReport),
    Lookup(LookupReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport {
    pub title: String,
    pub partitioner: &'static str,
    pub vnodes_per_node: usize,
    pub total_vnodes: usize,
    pub nodes: Vec<NodeId>,
    /// Fraction of the coordinate space owned by each node.
    pub ownership: BTreeMap<NodeId, f64>,
}

impl TopologyReport {
    pub fn new(title: impl Into<String>, ring: &HashRing, vnodes_per_node: usize) -> Self {
        Self {
            title: title.into(),
            partitioner: ring.partitioner_name(),
            vnodes_per_node,
            total_vnodes: ring.vnode_count(),
            nodes: ring.nodes().cloned().collect(),
            ownership: ring.ownership(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub title: String,
    pub stats: DistributionStats,
    pub load: LoadDistribution,
}

impl DistributionReport {
    pub fn new(title: impl Into<String>, load: LoadDistribution) -> Self {
        Self {
            title: title.into(),
            stats: distribution_stats(&load),
            load,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MovementReport {
    pub title: String,
    pub movement: Movement,
    pub percent: f64,
    /// Moved share predicted before the change, when there is one.
    pub expected_percent: Option<f64>,
}

impl MovementReport {
    pub fn new(title: impl Into<String>, movement: Movement, expected_fraction: Option<f64>) -> Self {
        Self {
            title: title.into(),
            movement,
            percent: movement.percent(),
            expected_percent: expected_fraction.map(|f| f * 100.0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub partitioner: &'static str,
    pub entries: Vec<LookupEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupEntry {
    pub key: String,
    /// Coordinate of the key itself.
    pub coordinate: Coordinate,
    /// Coordinate of the virtual node that owns it.
    pub vnode: Coordinate,
    pub replica: u32,
    pub node: NodeId,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Topology(t) => {
                writeln!(f, "\n=== {} ===", t.title)?;
                writeln!(
                    f,
                    "Physical nodes: {} | Total vnodes: {} | K={} | {}",
                    t.nodes.len(),
                    t.total_vnodes,
                    t.vnodes_per_node,
                    t.partitioner
                )?;
                let names: Vec<&str> = t.nodes.iter().map(NodeId::as_str).collect();
                writeln!(f, "Nodes: {}", names.join(", "))
            }
            Section::Distribution(d) => {
                let s = &d.stats;
                writeln!(f, "\n--- {} ---", d.title)?;
                writeln!(
                    f,
                    "keys={} nodes={} mean={:.2} min={} max={} variance={:.2} stdev={:.2}",
                    s.keys, s.nodes, s.mean, s.min, s.max, s.variance, s.stddev
                )
            }
            Section::Movement(m) => {
                write!(
                    f,
                    "\n{}: moved={}/{} ({:.2}%).",
                    m.title, m.movement.moved, m.movement.total, m.percent
                )?;
                match m.expected_percent {
                    Some(expected) => writeln!(f, " Expected ~ {expected:.2}%"),
                    None => writeln!(f),
                }
            }
            Section::Lookup(l) => {
                writeln!(f, "\n=== Lookup ({}) ===", l.partitioner)?;
                for e in &l.entries {
                    writeln!(
                        f,
                        "{} -> {} (key@{} vnode#{}@{})",
                        e.key, e.node, e.coordinate, e.replica, e.vnode
                    )?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_text_matches_driver_format() {
        let section = Section::Movement(MovementReport::new(
            "Rebalance (ADD)",
            Movement { moved: 1, total: 4 },
            Some(0.2),
        ));
        assert_eq!(
            section.to_string(),
            "\nRebalance (ADD): moved=1/4 (25.00%). Expected ~ 20.00%\n"
        );
    }

    #[test]
    fn test_sections_are_tagged_in_json() {
        let section = Section::Distribution(DistributionReport::new("d", LoadDistribution::default()));
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["section"], "distribution");
        assert_eq!(json["stats"]["nodes"], 0);
    }
}
