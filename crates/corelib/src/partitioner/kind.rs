//! Named partitioner selection for configuration files and the CLI.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::partitioner::{
    Blake3Partitioner, Partitioner, Sha1Partitioner, SipPartitioner, Xxh3Partitioner,
};

/// Selects one of the built-in partitioners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionerKind {
    #[default]
    Sha1,
    Blake3,
    Xxh3,
    Sip,
}

impl PartitionerKind {
    pub const ALL: [PartitionerKind; 4] = [
        PartitionerKind::Sha1,
        PartitionerKind::Blake3,
        PartitionerKind::Xxh3,
        PartitionerKind::Sip,
    ];

    /// Instantiate the partitioner.
    pub fn build(self) -> Arc<dyn Partitioner> {
        match self {
            PartitionerKind::Sha1 => Arc::new(Sha1Partitioner),
            PartitionerKind::Blake3 => Arc::new(Blake3Partitioner),
            PartitionerKind::Xxh3 => Arc::new(Xxh3Partitioner),
            PartitionerKind::Sip => Arc::new(SipPartitioner),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PartitionerKind::Sha1 => "sha1",
            PartitionerKind::Blake3 => "blake3",
            PartitionerKind::Xxh3 => "xxh3",
            PartitionerKind::Sip => "sip",
        }
    }
}

impl fmt::Display for PartitionerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartitionerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown partitioner '{s}' (expected sha1, blake3, xxh3 or sip)"))
    }
}
