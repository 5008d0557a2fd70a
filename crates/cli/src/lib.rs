//! Experiment driver for consistent hash rings.
//!
//! Provides commands for:
//! - Measuring key movement when a node joins or leaves
//! - Comparing load spread across virtual-node counts
//! - Resolving individual keys

pub mod commands;
pub mod config;
pub mod report;

pub use commands::{Command, CommandResult};
pub use config::{CliConfig, OutputFormat};
