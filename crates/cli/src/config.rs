//! Command-line configuration.
//!
//! Ring settings come from an optional JSON cluster file and are overridden by
//! flags:
//!
//! ```json
//! { "vnodes": 32, "partitioner": "xxh3", "nodes": ["10.0.0.1:7000", "10.0.0.2:7000"] }
//! ```

use crate::commands::{self, Command};
use anyhow::{bail, Context, Result};
use clap::Parser;
use corelib::{PartitionerKind, RingConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "hashring",
    version,
    about = "Inspect consistent hash rings and look up keys"
)]
pub struct CliConfig {
    /// Comma-separated node identities (replaces the cluster file's nodes).
    #[arg(long, value_delimiter = ',', global = true)]
    pub nodes: Vec<String>,

    /// Path to a JSON cluster file.
    #[arg(short, long, global = true)]
    pub cluster: Option<PathBuf>,

    /// Virtual entries per node.
    #[arg(long, global = true)]
    pub vnodes: Option<u32>,

    /// Hash function: xxh3, sip or blake3.
    #[arg(long, global = true)]
    pub partitioner: Option<PartitionerKind>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// On-disk cluster description.
#[derive(Debug, Default, Deserialize)]
pub struct ClusterFile {
    #[serde(flatten)]
    pub ring: RingConfig,
    #[serde(default)]
    pub nodes: Vec<String>,
}

impl ClusterFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading cluster file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing cluster file {}", path.display()))
    }
}

impl CliConfig {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let (ring, nodes) = self.resolve()?;
        let result = commands::execute(&self.command, &ring, nodes)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{result}");
        }
        Ok(())
    }

    /// Ring settings and node list after applying flags over the file.
    pub fn resolve(&self) -> Result<(RingConfig, Vec<String>)> {
        let mut cluster = match &self.cluster {
            Some(path) => ClusterFile::load(path)?,
            None => ClusterFile::default(),
        };

        if !self.nodes.is_empty() {
            cluster.nodes = self.nodes.clone();
        }
        if let Some(vnodes) = self.vnodes {
            cluster.ring.vnodes = vnodes;
        }
        if let Some(partitioner) = self.partitioner {
            cluster.ring.partitioner = partitioner;
        }

        if cluster.nodes.is_empty() {
            bail!("no nodes given; pass --nodes a,b,c or --cluster FILE");
        }
        cluster.ring.validate()?;
        Ok((cluster.ring, cluster.nodes))
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
