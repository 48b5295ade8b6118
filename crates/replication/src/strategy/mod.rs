//! Replication strategy abstractions.
//!
//! Replication strategies determine how many replicas to create and where
//! to place them on the ring.
//!
//! - **SimpleStrategy**: the first N nodes of the key's preference list

pub mod simple;

pub use simple::SimpleStrategy;

use corelib::{Ring, RingNode};

/// Trait for replication strategies over rings of node type `N`.
///
/// A replication strategy determines:
/// 1. How many replicas to create for a key
/// 2. Which nodes should hold those replicas
///
/// The trait is object safe, so strategies can be chosen at runtime as
/// `Box<dyn ReplicationStrategy<N>>`.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as they may be
/// shared across threads.
pub trait ReplicationStrategy<N: RingNode>: Send + Sync + 'static {
    /// Get the number of replicas this strategy creates.
    fn replication_factor(&self) -> usize;

    /// Find replica nodes for a given key.
    ///
    /// # Returns
    /// Distinct nodes that should hold replicas, primary first. Fewer than
    /// `replication_factor()` if the ring is smaller.
    ///
    /// # Performance
    /// One binary search over the ring's entries plus O(r) to copy out the
    /// replicas.
    fn replicas_for_key<'r>(&self, ring: &'r Ring<N>, key: &[u8]) -> Vec<&'r N>;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
