//! Error types for replica placement.

/// Errors raised when a strategy cannot be satisfied by a ring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplicationError {
    /// A replication factor of zero places no data at all.
    #[error("replication factor must be at least 1")]
    InvalidFactor,

    /// The ring has fewer nodes than the strategy wants replicas.
    #[error("need {required} distinct nodes, ring has {available}")]
    InsufficientNodes {
        required: usize,
        available: usize,
    },
}
