//! CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use corelib::{Ring, RingBuilder, RingConfig};
use replication::{ConsistencyLevel, ReplicationStrategy, SimpleStrategy};
use serde::Serialize;
use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the ranked nodes for a key.
    Lookup {
        key: String,

        /// Number of nodes to print (0 = all).
        #[arg(short = 'n', long, default_value_t = 0)]
        count: usize,

        /// Also place this many replicas and report the acks they need.
        #[arg(short, long)]
        replicas: Option<usize>,

        /// Consistency level for the replica report: one, quorum or all.
        #[arg(long, default_value = "quorum")]
        consistency: ConsistencyLevel,
    },

    /// Print ring size and how much of the hash space each node owns.
    Inspect,

    /// Time a ring build and a batch of lookups.
    Bench {
        /// Number of lookups to time.
        #[arg(long, default_value_t = 100_000)]
        lookups: usize,
    },
}

/// Output of a command, printable as text or JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum CommandResult {
    Lookup {
        key: String,
        nodes: Vec<String>,
        replicas: Option<ReplicaReport>,
    },
    Inspect(RingSummary),
    Bench(BenchReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplicaReport {
    pub nodes: Vec<String>,
    pub consistency: ConsistencyLevel,
    pub required_acks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RingSummary {
    pub partitioner: &'static str,
    pub vnodes: u32,
    pub entries: usize,
    pub nodes: Vec<NodeSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub identity: String,
    /// Percentage of the hash space this node is primary for.
    pub ownership: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub nodes: usize,
    pub vnodes: u32,
    pub build: Duration,
    pub lookups: usize,
    pub per_lookup: Duration,
}

pub fn execute(command: &Command, config: &RingConfig, nodes: Vec<String>) -> Result<CommandResult> {
    match command {
        Command::Lookup {
            key,
            count,
            replicas,
            consistency,
        } => {
            let ring = build(config, nodes)?;
            let ranked = ring.lookup(key.as_bytes(), *count);

            let replicas = match replicas {
                Some(factor) => {
                    let strategy = SimpleStrategy::new(*factor);
                    strategy.validate(&ring)?;
                    Some(ReplicaReport {
                        nodes: strategy
                            .replicas_for_key(&ring, key.as_bytes())
                            .into_iter()
                            .cloned()
                            .collect(),
                        consistency: *consistency,
                        required_acks: consistency.required_acks(*factor),
                    })
                }
                None => None,
            };

            Ok(CommandResult::Lookup {
                key: key.clone(),
                nodes: ranked.into_iter().cloned().collect(),
                replicas,
            })
        }
        Command::Inspect => {
            let ring = build(config, nodes)?;
            Ok(CommandResult::Inspect(summarize(&ring)))
        }
        Command::Bench { lookups } => {
            let node_count = nodes.len();
            let started = Instant::now();
            let ring = build(config, nodes)?;
            let build = started.elapsed();

            let keys: Vec<String> = (0..*lookups).map(|i| format!("key-{i}")).collect();
            let mut out = Vec::with_capacity(node_count);
            let started = Instant::now();
            for key in &keys {
                ring.lookup_into(key.as_bytes(), 0, &mut out);
                black_box(&out);
            }
            let elapsed = started.elapsed();
            let per_lookup = elapsed / u32::try_from((*lookups).max(1)).unwrap_or(u32::MAX);

            info!(?build, ?elapsed, lookups, "benchmark finished");
            Ok(CommandResult::Bench(BenchReport {
                nodes: node_count,
                vnodes: ring.vnodes(),
                build,
                lookups: *lookups,
                per_lookup,
            }))
        }
    }
}

fn build(config: &RingConfig, nodes: Vec<String>) -> Result<Ring<String>> {
    Ok(RingBuilder::from_config(config).add_nodes(nodes).build()?)
}

fn summarize(ring: &Ring<String>) -> RingSummary {
    let nodes = ring
        .nodes()
        .iter()
        .zip(ring.ownership())
        .map(|(identity, share)| NodeSummary {
            identity: identity.clone(),
            ownership: share * 100.0,
        })
        .collect();

    RingSummary {
        partitioner: ring.partitioner_name(),
        vnodes: ring.vnodes(),
        entries: ring.entry_count(),
        nodes,
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Lookup {
                key,
                nodes,
                replicas,
            } => {
                writeln!(f, "key: {key}")?;
                for (rank, node) in nodes.iter().enumerate() {
                    writeln!(f, "  {rank:>3}  {node}")?;
                }
                if let Some(report) = replicas {
                    writeln!(
                        f,
                        "replicas: {} ({} needs {} acks)",
                        report.nodes.join(", "),
                        report.consistency,
                        report.required_acks
                    )?;
                }
                Ok(())
            }
            CommandResult::Inspect(summary) => {
                writeln!(
                    f,
                    "partitioner: {}  vnodes: {}  entries: {}",
                    summary.partitioner, summary.vnodes, summary.entries
                )?;
                for node in &summary.nodes {
                    writeln!(f, "  {:<24} {:>7.3}%", node.identity, node.ownership)?;
                }
                Ok(())
            }
            CommandResult::Bench(report) => writeln!(
                f,
                "{} nodes x {} vnodes: build {:?}, {} lookups at {:?} each",
                report.nodes, report.vnodes, report.build, report.lookups, report.per_lookup
            ),
        }
    }
}
