//! Experiment commands.
//!
//! Each command is a plain procedure: build a ring, feed it a key
//! population, change the topology and collect report sections. Nothing is
//! kept between runs.

use std::fmt;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use corelib::{HashRing, PartitionerKind, RingConfig};
use rebalancer::{
    expected_move_fraction_add, key_movement, load_distribution, load_distribution_parallel,
    KeySampler, LoadDistribution,
};
use serde::Serialize;
use tracing::info;

use crate::report::{
    DistributionReport, LookupEntry, LookupReport, MovementReport, Section, TopologyReport,
};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add (and optionally remove) a node and measure key movement.
    Experiment(ExperimentArgs),
    /// Compare load spread across several vnode counts.
    Compare(CompareArgs),
    /// Resolve keys against a ring of generated nodes.
    Lookup(LookupArgs),
    /// Run the default scenario set.
    Demo(DemoArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ExperimentArgs {
    /// Number of keys in the population.
    #[arg(long, default_value_t = 200_000)]
    pub keys: usize,
    /// Initial physical nodes (`node_0` .. `node_{n-1}`).
    #[arg(long, default_value_t = 5)]
    pub nodes: usize,
    /// Virtual nodes per physical node (K).
    #[arg(long, default_value_t = 1)]
    pub vnodes: usize,
    /// Node to add after the initial measurement.
    #[arg(long, default_value = "node_new")]
    pub add: String,
    /// Node to remove after the addition.
    #[arg(long)]
    pub remove: Option<String>,
    /// Seed for the key population.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Worker threads for load counting (0 or 1 runs inline, capped at the core count).
    #[arg(long, default_value_t = 0)]
    pub workers: usize,
}

#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    #[arg(long, default_value_t = 200_000)]
    pub keys: usize,
    #[arg(long, default_value_t = 10)]
    pub nodes: usize,
    /// Comma-separated vnode counts to compare.
    #[arg(long, value_delimiter = ',', default_values_t = [1usize, 50, 200])]
    pub vnodes: Vec<usize>,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    #[arg(long, default_value_t = 0)]
    pub workers: usize,
}

#[derive(Debug, Clone, Args)]
pub struct LookupArgs {
    #[arg(long, default_value_t = 3)]
    pub nodes: usize,
    #[arg(long, default_value_t = 100)]
    pub vnodes: usize,
    /// Keys to resolve.
    #[arg(required = true)]
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DemoArgs {
    #[arg(long, default_value_t = 200_000)]
    pub keys: usize,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Report sections produced by a command, in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommandResult {
    pub sections: Vec<Section>,
}

impl CommandResult {
    fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    fn extend(&mut self, other: CommandResult) {
        self.sections.extend(other.sections);
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.sections.iter().try_for_each(|section| write!(f, "{section}"))
    }
}

impl Command {
    pub fn execute(self, partitioner: PartitionerKind) -> Result<CommandResult> {
        match self {
            Command::Experiment(args) => {
                let keys = KeySampler::new(args.seed).keys(args.keys);
                run_experiment(&ring_config(partitioner, args.vnodes), &args, &keys)
            }
            Command::Compare(args) => {
                let keys = KeySampler::new(args.seed).keys(args.keys);
                compare_vnodes(partitioner, &args, &keys)
            }
            Command::Lookup(args) => lookup(&ring_config(partitioner, args.vnodes), &args),
            Command::Demo(args) => demo(partitioner, &args),
        }
    }
}

fn ring_config(partitioner: PartitionerKind, vnodes_per_node: usize) -> RingConfig {
    RingConfig {
        vnodes_per_node,
        partitioner,
    }
}

fn node_name(i: usize) -> String {
    format!("node_{i}")
}

fn build_ring(config: &RingConfig, nodes: usize) -> Result<HashRing> {
    config
        .builder()
        .add_nodes((0..nodes).map(node_name))
        .build()
        .context("failed to build initial ring")
}

fn distribute(ring: &HashRing, keys: &[String], workers: usize) -> Result<LoadDistribution> {
    let snapshot = ring.snapshot();
    let load = if workers > 1 {
        load_distribution_parallel(&snapshot, keys, workers)?
    } else {
        load_distribution(&snapshot, keys)?
    };
    Ok(load)
}

/// Build `args.nodes` nodes, add `args.add`, optionally remove
/// `args.remove`, and report distribution and movement at every step.
pub fn run_experiment(
    config: &RingConfig,
    args: &ExperimentArgs,
    keys: &[String],
) -> Result<CommandResult> {
    let k = config.vnodes_per_node;
    let mut result = CommandResult::default();
    let mut ring = build_ring(config, args.nodes)?;
    info!(nodes = args.nodes, vnodes = k, keys = keys.len(), "initial ring built");

    result.push(Section::Topology(TopologyReport::new("Initial Ring", &ring, k)));
    let before = ring.snapshot();
    result.push(Section::Distribution(DistributionReport::new(
        "Key distribution BEFORE change",
        distribute(&ring, keys, args.workers)?,
    )));

    ring.add_node(args.add.as_str(), k)
        .with_context(|| format!("failed to add node {}", args.add))?;
    info!(node = %args.add, "node added");
    result.push(Section::Topology(TopologyReport::new("After ADD", &ring, k)));
    let after_add = ring.snapshot();
    let load_after_add = distribute(&ring, keys, args.workers)?;

    let moved = key_movement(&before, &after_add, keys)?;
    info!(moved = moved.moved, total = moved.total, "measured movement after add");
    result.push(Section::Distribution(DistributionReport::new(
        "Key distribution AFTER add",
        load_after_add.clone(),
    )));
    result.push(Section::Movement(MovementReport::new(
        "Rebalance (ADD)",
        moved,
        Some(expected_move_fraction_add(ring.node_count())),
    )));

    if let Some(victim) = &args.remove {
        // Exactly the victim's keys are expected to move.
        let victim_share = match load_after_add.total() {
            0 => 0.0,
            total => load_after_add.get(victim) as f64 / total as f64,
        };

        ring.remove_node(victim)
            .with_context(|| format!("failed to remove node {victim}"))?;
        info!(node = %victim, "node removed");
        result.push(Section::Topology(TopologyReport::new(
            format!("After REMOVE {victim}"),
            &ring,
            k,
        )));
        let after_remove = ring.snapshot();
        result.push(Section::Distribution(DistributionReport::new(
            "Key distribution AFTER remove",
            distribute(&ring, keys, args.workers)?,
        )));

        let moved = key_movement(&after_add, &after_remove, keys)?;
        info!(moved = moved.moved, total = moved.total, "measured movement after remove");
        result.push(Section::Movement(MovementReport::new(
            "Rebalance (REMOVE)",
            moved,
            Some(victim_share),
        )));
    }

    Ok(result)
}

/// Load spread on the same node set for each vnode count in `args.vnodes`.
pub fn compare_vnodes(
    partitioner: PartitionerKind,
    args: &CompareArgs,
    keys: &[String],
) -> Result<CommandResult> {
    let mut result = CommandResult::default();
    for &k in &args.vnodes {
        let ring = build_ring(&ring_config(partitioner, k), args.nodes)?;
        info!(vnodes = k, "comparing distribution");
        result.push(Section::Topology(TopologyReport::new(
            format!("VNode Comparison (K={k})"),
            &ring,
            k,
        )));
        result.push(Section::Distribution(DistributionReport::new(
            format!("Distribution with K={k}"),
            distribute(&ring, keys, args.workers)?,
        )));
    }
    Ok(result)
}

pub fn lookup(config: &RingConfig, args: &LookupArgs) -> Result<CommandResult> {
    let ring = build_ring(config, args.nodes)?;
    let entries = args
        .keys
        .iter()
        .map(|key| -> Result<LookupEntry> {
            let (vnode, owner) = ring.lookup_vnode(key)?;
            Ok(LookupEntry {
                key: key.clone(),
                coordinate: ring.partitioner().coordinate(key.as_bytes()),
                vnode,
                replica: owner.replica,
                node: owner.node_id.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CommandResult {
        sections: vec![Section::Lookup(LookupReport {
            partitioner: ring.partitioner_name(),
            entries,
        })],
    })
}

/// Movement without and with virtual nodes, then a vnode comparison.
pub fn demo(partitioner: PartitionerKind, args: &DemoArgs) -> Result<CommandResult> {
    let keys = KeySampler::new(args.seed).keys(args.keys);
    let mut result = CommandResult::default();

    for k in [1, 200] {
        let experiment = ExperimentArgs {
            keys: args.keys,
            nodes: 5,
            vnodes: k,
            add: node_name(5),
            remove: Some(node_name(2)),
            seed: args.seed,
            workers: 0,
        };
        result.extend(run_experiment(&ring_config(partitioner, k), &experiment, &keys)?);
    }

    let compare = CompareArgs {
        keys: args.keys,
        nodes: 10,
        vnodes: vec![1, 50, 200],
        seed: args.seed,
        workers: 0,
    };
    result.extend(compare_vnodes(partitioner, &compare, &keys)?);
    Ok(result)
}
