//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a ring.
///
/// Lookups never fail; every variant here comes out of the builder (or
/// config validation that runs before it).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Invalid build input: empty node set, zero vnodes, or a ring too large
    /// to index.
    #[error("invalid ring configuration: {0}")]
    Config(String),

    /// Two nodes report the same hash identity.
    ///
    /// Duplicates are rejected rather than collapsed, so the caller always
    /// knows which node a ring position refers to.
    #[error("duplicate node identity {identity:?} at positions {first} and {second}")]
    DuplicateIdentity {
        /// The identity shared by both nodes.
        identity: String,
        /// Index of the first node carrying it.
        first: usize,
        /// Index of the second node carrying it.
        second: usize,
    },

    /// A built preference list failed its post-condition check.
    ///
    /// This indicates a defect in hashing or rotation, not a usage error.
    #[error("ring invariant violated: {0}")]
    InvariantViolation(String),
}
