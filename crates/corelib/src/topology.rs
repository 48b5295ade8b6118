//! Ring topology changes.
//!
//! Rings are immutable, so a membership change is a rebuild. [`SharedRing`]
//! holds the current ring behind a lock that is only taken to clone or
//! replace an `Arc`; lookups run against the cloned `Arc` with no lock held.
//! [`reassignments`] reports which keys a rebuild moves.

use crate::error::Result;
use crate::node::RingNode;
use crate::ring::{Ring, RingBuilder};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Hot-swappable handle to the current ring.
///
/// Readers that loaded the previous ring keep using it until they drop their
/// `Arc`; it is never mutated.
#[derive(Debug)]
pub struct SharedRing<N> {
    current: RwLock<Arc<Ring<N>>>,
}

impl<N> SharedRing<N> {
    pub fn new(ring: Ring<N>) -> Self {
        Self {
            current: RwLock::new(Arc::new(ring)),
        }
    }

    /// The current ring.
    pub fn load(&self) -> Arc<Ring<N>> {
        self.current.read().clone()
    }

    /// Replace the current ring, returning the previous one.
    pub fn store(&self, ring: Ring<N>) -> Arc<Ring<N>> {
        self.swap(Arc::new(ring))
    }

    fn swap(&self, ring: Arc<Ring<N>>) -> Arc<Ring<N>> {
        let nodes = ring.node_count();
        let entries = ring.entry_count();
        let old = std::mem::replace(&mut *self.current.write(), ring);
        info!(
            old_nodes = old.node_count(),
            nodes, entries, "swapped ring"
        );
        old
    }
}

impl<N: RingNode> SharedRing<N> {
    /// Build a ring for `nodes` with the current ring's vnodes and
    /// partitioner, and make it current.
    ///
    /// On error the current ring stays in place.
    pub fn rebuild(&self, nodes: impl IntoIterator<Item = N>) -> Result<Arc<Ring<N>>> {
        let current = self.load();
        let ring = RingBuilder::new()
            .with_vnodes(current.vnodes())
            .with_shared_partitioner(Arc::clone(current.partitioner()))
            .add_nodes(nodes)
            .build()?;

        let ring = Arc::new(ring);
        self.swap(Arc::clone(&ring));
        Ok(ring)
    }
}

/// A key whose top-`n` assignment differs between two rings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment<'k> {
    pub key: &'k [u8],
    /// Node identities in the old ring, ranked.
    pub before: Vec<String>,
    /// Node identities in the new ring, ranked.
    pub after: Vec<String>,
}

/// Compare the top-`n` nodes of each key in `old` and `new`.
///
/// Nodes are compared by `hash_id`, since the same node may sit at different
/// indices in the two rings. `n == 0` compares full preference lists.
pub fn reassignments<'k, N, K>(
    old: &Ring<N>,
    new: &Ring<N>,
    keys: &'k [K],
    n: usize,
) -> Vec<Reassignment<'k>>
where
    N: RingNode,
    K: AsRef<[u8]>,
{
    let identities = |ring: &Ring<N>, key: &[u8]| -> Vec<String> {
        ring.lookup(key, n)
            .into_iter()
            .map(|node| node.hash_id().to_owned())
            .collect()
    };

    keys.iter()
        .filter_map(|key| {
            let key = key.as_ref();
            let before = identities(old, key);
            let after = identities(new, key);
            (before != after).then_some(Reassignment { key, before, after })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioner::SipPartitioner;

    fn keys(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("key-{i}")).collect()
    }

    #[test]
    fn test_store_returns_previous() {
        let shared = SharedRing::new(Ring::new(["a", "b"], 4).unwrap());
        let before = shared.load();
        let old = shared.store(Ring::new(["a", "b", "c"], 4).unwrap());

        assert!(Arc::ptr_eq(&before, &old));
        assert_eq!(shared.load().node_count(), 3);
        // The previous ring is still usable.
        assert_eq!(before.lookup(b"k", 0).len(), 2);
    }

    #[test]
    fn test_rebuild_keeps_settings() {
        let ring = RingBuilder::new()
            .with_vnodes(3)
            .with_partitioner(SipPartitioner)
            .add_nodes(["a", "b"])
            .build()
            .unwrap();
        let shared = SharedRing::new(ring);

        let rebuilt = shared.rebuild(["a", "b", "c"]).unwrap();
        assert_eq!(rebuilt.vnodes(), 3);
        assert_eq!(rebuilt.entry_count(), 9);
        assert_eq!(rebuilt.partitioner_name(), "SipPartitioner");
        assert!(Arc::ptr_eq(&rebuilt, &shared.load()));
    }

    #[test]
    fn test_failed_rebuild_keeps_current() {
        let shared = SharedRing::new(Ring::new(["a", "b"], 2).unwrap());
        assert!(shared.rebuild(["x", "x"]).is_err());
        assert!(shared.rebuild(Vec::<&str>::new()).is_err());
        assert_eq!(shared.load().node_count(), 2);
    }

    #[test]
    fn test_identical_rings_have_no_reassignments() {
        let a = Ring::new(["a", "b", "c"], 8).unwrap();
        let b = Ring::new(["a", "b", "c"], 8).unwrap();
        assert!(reassignments(&a, &b, &keys(200), 0).is_empty());
    }

    #[test]
    fn test_removal_only_moves_removed_primaries() {
        let old = Ring::new(["a", "b", "c", "d"], 16).unwrap();
        let new = Ring::new(["a", "b", "d"], 16).unwrap();
        let keys = keys(500);

        let moved = reassignments(&old, &new, &keys, 1);
        assert!(!moved.is_empty());
        for r in &moved {
            assert_eq!(r.before, vec!["c".to_string()]);
        }
    }
}
