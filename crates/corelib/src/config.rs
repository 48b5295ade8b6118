//! Ring configuration.

use crate::error::{Error, Result};
use crate::partitioner::PartitionerKind;
use serde::{Deserialize, Serialize};

/// Default number of virtual entries per physical node.
///
/// Storage grows with `nodes² × vnodes` (every entry holds a full preference
/// list), so this is lower than the usual per-token ring default.
pub const DEFAULT_VNODES: u32 = 64;

/// Build parameters for a [`Ring`](crate::ring::Ring).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Virtual entries per physical node (the replication factor of ring
    /// positions, not of data).
    pub vnodes: u32,
    /// Hash function used for placement and lookup.
    pub partitioner: PartitionerKind,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            vnodes: DEFAULT_VNODES,
            partitioner: PartitionerKind::default(),
        }
    }
}

impl RingConfig {
    pub fn new(vnodes: u32) -> Self {
        Self {
            vnodes,
            ..Self::default()
        }
    }

    pub fn with_partitioner(mut self, partitioner: PartitionerKind) -> Self {
        self.partitioner = partitioner;
        self
    }

    /// Rejects settings no ring can be built from.
    pub fn validate(&self) -> Result<()> {
        if self.vnodes == 0 {
            return Err(Error::Config("vnodes must be at least 1".into()));
        }
        Ok(())
    }
}
