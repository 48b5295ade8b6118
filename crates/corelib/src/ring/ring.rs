//! The immutable hash ring and its lookup operations.

use crate::error::Result;
use crate::node::{NodeIndex, RingNode};
use crate::partitioner::Partitioner;
use crate::ring::builder::RingBuilder;
use crate::ring::position::successor;
use crate::vnode::{EntryRef, VirtualEntry};
use std::sync::Arc;

/// Size of the token space, `2^64`, as a float.
const TOKEN_SPACE: f64 = 18_446_744_073_709_551_616.0;

/// Consistent hash ring with a full preference list per position.
///
/// A ring is created once by [`RingBuilder`] and never mutated afterwards.
/// It is `Send + Sync` whenever `N` is, so any number of threads may look up
/// keys concurrently without locking. A topology change means building a new
/// ring; this one stays valid for as long as the caller holds it.
///
/// # Lookup
///
/// The key is hashed with the ring's partitioner and the first entry whose
/// token is `>=` the key's token is selected (wrapping to the first entry past
/// the end). The result is that entry's preference list: primary node first,
/// then fallbacks, never a node twice.
#[derive(Debug, Clone)]
pub struct Ring<N> {
    nodes: Vec<N>,
    /// Sorted by `(token, node_index, copy)`.
    entries: Vec<VirtualEntry>,
    /// `entries.len() * nodes.len()` slots, one list per entry.
    preferences: Vec<NodeIndex>,
    vnodes: u32,
    partitioner: Arc<dyn Partitioner>,
}

impl<N: RingNode> Ring<N> {
    /// Build a ring with `vnodes` entries per node and the default partitioner.
    ///
    /// Shorthand for `RingBuilder::new().with_vnodes(vnodes).add_nodes(nodes).build()`.
    pub fn new(nodes: impl IntoIterator<Item = N>, vnodes: u32) -> Result<Self> {
        RingBuilder::new()
            .with_vnodes(vnodes)
            .add_nodes(nodes)
            .build()
    }
}

impl<N> Ring<N> {
    pub(crate) fn from_parts(
        nodes: Vec<N>,
        entries: Vec<VirtualEntry>,
        preferences: Vec<NodeIndex>,
        vnodes: u32,
        partitioner: Arc<dyn Partitioner>,
    ) -> Self {
        Self {
            nodes,
            entries,
            preferences,
            vnodes,
            partitioner,
        }
    }

    /// Position of the entry responsible for `key`.
    #[inline]
    pub fn position_for(&self, key: &[u8]) -> usize {
        successor(&self.entries, self.partitioner.token(key))
    }

    /// Ranked node indices for `key`, borrowed from the ring.
    ///
    /// `n == 0` returns all nodes; `n` larger than the node count is clamped.
    pub fn lookup_indices(&self, key: &[u8], n: usize) -> &[NodeIndex] {
        let list = self.preference_at(self.position_for(key));
        if n == 0 || n >= list.len() {
            list
        } else {
            &list[..n]
        }
    }

    /// Ranked nodes for `key`: primary first, then fallbacks.
    ///
    /// `n == 0` returns all nodes; `n` larger than the node count is clamped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use corelib::Ring;
    ///
    /// let ring = Ring::new(["a", "b", "c"], 2).unwrap();
    /// let replicas = ring.lookup(b"hello", 2);
    /// assert_eq!(replicas.len(), 2);
    /// assert_ne!(replicas[0], replicas[1]);
    /// ```
    pub fn lookup(&self, key: &[u8], n: usize) -> Vec<&N> {
        let mut out = Vec::new();
        self.lookup_into(key, n, &mut out);
        out
    }

    /// Like [`lookup`](Self::lookup) but writes into a caller-owned buffer.
    ///
    /// `out` is cleared first. The ring keeps no reference to it.
    pub fn lookup_into<'a>(&'a self, key: &[u8], n: usize, out: &mut Vec<&'a N>) {
        out.clear();
        out.extend(
            self.lookup_indices(key, n)
                .iter()
                .map(|&index| &self.nodes[index as usize]),
        );
    }

    /// The primary node for `key`.
    pub fn primary(&self, key: &[u8]) -> &N {
        let index = self.preference_at(self.position_for(key))[0];
        &self.nodes[index as usize]
    }

    /// Physical nodes in build order; `NodeIndex` values index this slice.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> Option<&N> {
        self.nodes.get(index as usize)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of virtual entries (`node_count * vnodes`).
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn vnodes(&self) -> u32 {
        self.vnodes
    }

    pub fn partitioner(&self) -> &Arc<dyn Partitioner> {
        &self.partitioner
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    pub fn entry(&self, position: usize) -> Option<EntryRef<'_>> {
        let entry = self.entries.get(position)?;
        Some(EntryRef {
            token: entry.token,
            node_index: entry.node_index,
            copy: entry.copy,
            preference: self.preference_at(position),
        })
    }

    /// All ring positions in token order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = EntryRef<'_>> + '_ {
        self.entries
            .iter()
            .zip(self.preferences.chunks_exact(self.nodes.len()))
            .map(|(entry, preference)| EntryRef {
                token: entry.token,
                node_index: entry.node_index,
                copy: entry.copy,
                preference,
            })
    }

    /// Fraction of the token space for which each node is the primary,
    /// indexed by `NodeIndex`. The fractions sum to 1.
    pub fn ownership(&self) -> Vec<f64> {
        let mut owned = vec![0u128; self.nodes.len()];
        let len = self.entries.len();

        for (i, entry) in self.entries.iter().enumerate() {
            let prev = &self.entries[(i + len - 1) % len];
            let width = match prev.token.distance_to(&entry.token) {
                // Only the first entry can close a zero-length arc that wraps
                // the whole ring (every token equal).
                0 if i == 0 => 1u128 << 64,
                d => u128::from(d),
            };
            owned[entry.node_index as usize] += width;
        }

        owned
            .into_iter()
            .map(|width| width as f64 / TOKEN_SPACE)
            .collect()
    }

    #[inline]
    fn preference_at(&self, position: usize) -> &[NodeIndex] {
        let n = self.nodes.len();
        &self.preferences[position * n..(position + 1) * n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    /// Places copy `c` of node `"k"` at token `k * 100 + c` and hashes keys
    /// by parsing them as decimal numbers.
    #[derive(Debug)]
    struct NumericPartitioner;

    impl Partitioner for NumericPartitioner {
        fn token(&self, key: &[u8]) -> Token {
            let n = std::str::from_utf8(key).unwrap().parse().unwrap();
            Token(n)
        }

        fn vnode_token(&self, identity: &str, copy: u32, _scratch: &mut Vec<u8>) -> Token {
            let k: u64 = identity.parse().unwrap();
            Token(k * 100 + u64::from(copy))
        }

        fn name(&self) -> &'static str {
            "NumericPartitioner"
        }
    }

    fn numeric_ring(nodes: &[&'static str], vnodes: u32) -> Ring<&'static str> {
        RingBuilder::new()
            .with_vnodes(vnodes)
            .with_partitioner(NumericPartitioner)
            .add_nodes(nodes.iter().copied())
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup_selects_successor() {
        // Tokens: "1" -> 100, 101; "2" -> 200, 201; "3" -> 300, 301.
        let ring = numeric_ring(&["3", "1", "2"], 2);
        assert_eq!(ring.lookup(b"150", 1), vec![&"2"]);
        assert_eq!(ring.lookup(b"200", 1), vec![&"2"]);
        assert_eq!(ring.lookup(b"0", 1), vec![&"1"]);
    }

    #[test]
    fn test_lookup_wraps_to_first_entry() {
        let ring = numeric_ring(&["3", "1", "2"], 2);
        let first = ring.entry(0).unwrap();
        assert_eq!(first.token, Token(100));
        assert_eq!(ring.position_for(b"302"), 0);
        assert_eq!(ring.lookup_indices(b"302", 0), first.preference);
        assert_eq!(ring.lookup(b"302", 0), vec![&"1", &"2", &"3"]);
    }

    #[test]
    fn test_rotated_preferences() {
        // Sorted: 1,1,2,2,3,3 -> base [1, 2, 3].
        let ring = numeric_ring(&["3", "1", "2"], 2);
        assert_eq!(ring.lookup(b"100", 0), vec![&"1", &"2", &"3"]);
        assert_eq!(ring.lookup(b"201", 0), vec![&"2", &"1", &"3"]);
        assert_eq!(ring.lookup(b"250", 0), vec![&"3", &"1", &"2"]);
    }

    #[test]
    fn test_lookup_clamps_count() {
        let ring = numeric_ring(&["1", "2"], 1);
        assert_eq!(ring.lookup(b"5", 10).len(), 2);
        assert_eq!(ring.lookup(b"5", 0).len(), 2);
        assert_eq!(ring.lookup(b"5", 1).len(), 1);
    }

    #[test]
    fn test_lookup_into_reuses_buffer() {
        let ring = numeric_ring(&["1", "2", "3"], 1);
        let mut out = Vec::with_capacity(8);
        ring.lookup_into(b"150", 2, &mut out);
        assert_eq!(out, vec![&"2", &"1"]);
        ring.lookup_into(b"0", 1, &mut out);
        assert_eq!(out, vec![&"1"]);
    }

    #[test]
    fn test_primary_matches_lookup() {
        let ring = numeric_ring(&["1", "2", "3"], 3);
        for key in ["0", "99", "101", "250", "302", "999"] {
            assert_eq!(ring.primary(key.as_bytes()), ring.lookup(key.as_bytes(), 1)[0]);
        }
    }

    #[test]
    fn test_ownership_arcs() {
        // "1" at 100, "2" at 200: "2" owns (100, 200], "1" owns the rest.
        let ring = numeric_ring(&["1", "2"], 1);
        let owned = ring.ownership();
        assert!((owned[1] - 100.0 / TOKEN_SPACE).abs() < 1e-18);
        assert!((owned.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ownership_single_entry_owns_everything() {
        let ring = numeric_ring(&["1"], 1);
        assert_eq!(ring.ownership(), vec![1.0]);
    }

    #[test]
    fn test_entries_view() {
        let ring = numeric_ring(&["2", "1"], 2);
        let tokens: Vec<u64> = ring.entries().map(|e| e.token.0).collect();
        assert_eq!(tokens, vec![100, 101, 200, 201]);
        assert_eq!(ring.entries().len(), ring.entry_count());
        assert!(ring.entry(4).is_none());
        assert_eq!(ring.node(1), Some(&"1"));
        assert_eq!(ring.node(2), None);
    }
}
