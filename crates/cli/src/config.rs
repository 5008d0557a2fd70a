//! Command-line configuration.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use corelib::PartitionerKind;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

#[derive(Debug, Parser)]
#[command(
    name = "ring-sim",
    version,
    about = "Measure key movement and load spread on a consistent hash ring"
)]
pub struct CliConfig {
    /// Log level filter used when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "RING_SIM_LOG", default_value = "info")]
    pub log_level: String,

    /// Output format for reports.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Coordinate function for keys and virtual nodes (sha1, blake3, xxh3, sip).
    #[arg(long, global = true, default_value_t = PartitionerKind::Sha1)]
    pub partitioner: PartitionerKind,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl CliConfig {
    /// Install the `tracing` subscriber.
    ///
    /// Respects `RUST_LOG` if set, otherwise uses `--log-level`. Logs go to
    /// stderr so reports on stdout stay machine-readable.
    pub fn init_tracing(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    /// Execute the selected command and print its report.
    pub fn run(self) -> Result<()> {
        let result = self.command.execute(self.partitioner)?;

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match self.format {
            OutputFormat::Text => write!(out, "{result}"),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, &result).context("failed to encode report")?;
                writeln!(out)
            }
        }
        .context("failed to write report")
    }
}
