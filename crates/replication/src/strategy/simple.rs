//! Simple replication strategy.
//!
//! Replicas are the first `replication_factor` nodes of the key's preference
//! list. Because every preference list ranks all nodes, the list also gives
//! the failover order when some replicas are unavailable.
//!
//! # Performance
//!
//! - **Time**: O(log e + r) for e ring entries and r replicas
//! - **Space**: O(r) - returns Vec of node references

use crate::error::ReplicationError;
use crate::strategy::ReplicationStrategy;
use corelib::{Ring, RingNode};

/// Simple replication strategy: N replicas taken from the preference list.
///
/// # Example
///
/// ```rust
/// use corelib::Ring;
/// use replication::{ReplicationStrategy, SimpleStrategy};
///
/// let ring = Ring::new(["n1", "n2", "n3", "n4"], 8).unwrap();
/// let strategy = SimpleStrategy::new(3);
///
/// let replicas = strategy.replicas_for_key(&ring, b"my-key");
/// assert_eq!(replicas.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleStrategy {
    /// Number of replicas to create (including primary).
    replication_factor: usize,
}

impl SimpleStrategy {
    /// Create a new simple strategy with the given replication factor.
    ///
    /// # Arguments
    /// * `replication_factor` - Number of replicas (typically 1-5)
    ///   - 1: No replication (single copy)
    ///   - 3: Standard (primary + 2 replicas)
    ///   - 5: High availability (primary + 4 replicas)
    pub fn new(replication_factor: usize) -> Self {
        Self { replication_factor }
    }

    /// Number of replicas, including the primary.
    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    /// Check that `ring` can hold every replica on a distinct node.
    pub fn validate<N>(&self, ring: &Ring<N>) -> Result<(), ReplicationError> {
        if self.replication_factor == 0 {
            return Err(ReplicationError::InvalidFactor);
        }
        if ring.node_count() < self.replication_factor {
            return Err(ReplicationError::InsufficientNodes {
                required: self.replication_factor,
                available: ring.node_count(),
            });
        }
        Ok(())
    }

    /// Replicas for `key`, skipping nodes for which `accept` is false.
    ///
    /// Walks the full preference list, so a rejected node is replaced by the
    /// next node in the key's ranking. Returns fewer than
    /// `replication_factor` nodes only when not enough nodes are accepted.
    pub fn replicas_where<'r, N, F>(&self, ring: &'r Ring<N>, key: &[u8], mut accept: F) -> Vec<&'r N>
    where
        N: RingNode,
        F: FnMut(&N) -> bool,
    {
        ring.lookup(key, 0)
            .into_iter()
            .filter(|node| accept(*node))
            .take(self.replication_factor)
            .collect()
    }
}

impl Default for SimpleStrategy {
    /// Three replicas.
    fn default() -> Self {
        Self::new(3)
    }
}

impl<N: RingNode> ReplicationStrategy<N> for SimpleStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replicas_for_key<'r>(&self, ring: &'r Ring<N>, key: &[u8]) -> Vec<&'r N> {
        if self.replication_factor == 0 {
            return Vec::new();
        }
        ring.lookup(key, self.replication_factor)
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{Node, NodeId};
    use std::collections::HashSet;

    fn ring(count: usize) -> Ring<Node> {
        let nodes = (0..count).map(|i| Node::new(NodeId(i as u128), format!("node{i}")));
        Ring::new(nodes, 4).unwrap()
    }

    #[test]
    fn test_simple_strategy_replication_factor() {
        let strategy = SimpleStrategy::new(3);
        assert_eq!(strategy.replication_factor(), 3);
        assert_eq!(SimpleStrategy::default().replication_factor(), 3);
        assert_eq!(ReplicationStrategy::<Node>::name(&strategy), "SimpleStrategy");
    }

    #[test]
    fn test_strategy_as_trait_object() {
        let ring = ring(4);
        let strategies: Vec<Box<dyn ReplicationStrategy<Node>>> =
            vec![Box::new(SimpleStrategy::new(1)), Box::new(SimpleStrategy::new(3))];

        for strategy in &strategies {
            let replicas = strategy.replicas_for_key(&ring, b"shared-key");
            assert_eq!(replicas.len(), strategy.replication_factor());
            assert_eq!(replicas[0], ring.primary(b"shared-key"));
        }
    }

    #[test]
    fn test_simple_strategy_replicas() {
        let ring = ring(3);
        let strategy = SimpleStrategy::new(3);
        let replicas = strategy.replicas_for_key(&ring, b"test-key");

        assert_eq!(replicas.len(), 3);
        // Should have unique nodes
        let unique: HashSet<NodeId> = replicas.iter().map(|n| n.id).collect();
        assert_eq!(unique.len(), 3);
        // Primary first
        assert_eq!(replicas[0], ring.primary(b"test-key"));
    }

    #[test]
    fn test_replicas_capped_by_ring_size() {
        let ring = ring(2);
        assert_eq!(SimpleStrategy::new(5).replicas_for_key(&ring, b"k").len(), 2);
        assert!(SimpleStrategy::new(0).replicas_for_key(&ring, b"k").is_empty());
    }

    #[test]
    fn test_validate() {
        let ring = ring(2);
        assert!(SimpleStrategy::new(2).validate(&ring).is_ok());
        assert_eq!(
            SimpleStrategy::new(3).validate(&ring),
            Err(ReplicationError::InsufficientNodes {
                required: 3,
                available: 2,
            })
        );
        assert_eq!(
            SimpleStrategy::new(0).validate(&ring),
            Err(ReplicationError::InvalidFactor)
        );
    }

    #[test]
    fn test_replicas_where_fails_over() {
        let ring = ring(5);
        let strategy = SimpleStrategy::new(2);
        let ranked = ring.lookup(b"object", 0);

        let down = ranked[0].id;
        let replicas = strategy.replicas_where(&ring, b"object", |n| n.id != down);

        assert_eq!(replicas, vec![ranked[1], ranked[2]]);
    }

    #[test]
    fn test_replicas_where_none_accepted() {
        let ring = ring(3);
        let replicas = SimpleStrategy::new(2).replicas_where(&ring, b"object", |_| false);
        assert!(replicas.is_empty());
    }
}
