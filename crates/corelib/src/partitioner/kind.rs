//! Runtime selection of a partitioner.

use crate::partitioner::{Blake3Partitioner, Partitioner, SipPartitioner, Xxh3Partitioner};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Names the partitioner a ring is built with.
///
/// Serialized in lowercase (`"xxh3"`, `"sip"`, `"blake3"`) so it can be
/// written in config files and passed on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionerKind {
    #[default]
    Xxh3,
    Sip,
    Blake3,
}

impl PartitionerKind {
    /// Instantiates the partitioner.
    pub fn into_partitioner(self) -> Arc<dyn Partitioner> {
        match self {
            PartitionerKind::Xxh3 => Arc::new(Xxh3Partitioner),
            PartitionerKind::Sip => Arc::new(SipPartitioner),
            PartitionerKind::Blake3 => Arc::new(Blake3Partitioner),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionerKind::Xxh3 => "xxh3",
            PartitionerKind::Sip => "sip",
            PartitionerKind::Blake3 => "blake3",
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
        match s.to_ascii_lowercase().as_str() {
            "xxh3" => Ok(PartitionerKind::Xxh3),
            "sip" => Ok(PartitionerKind::Sip),
            "blake3" => Ok(PartitionerKind::Blake3),
            other => Err(format!(
                "unknown partitioner {other:?} (expected xxh3, sip or blake3)"
            )),
        }
    }
}
