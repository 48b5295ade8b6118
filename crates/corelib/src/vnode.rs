//! Virtual entries.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Each physical node is placed on the ring `vnodes` times, at tokens derived
//! from its identity and a copy index. More entries per node give a smoother
//! spread of keys across nodes.
//!
//! Unlike a plain token ring, every entry here also carries a complete
//! preference list: a ranking of *all* physical nodes, starting with the
//! entry's own node. A lookup therefore resolves primary and fallback nodes
//! with a single binary search.
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(n² · v) for n nodes and v vnodes per node (n · v entries,
//!   each with a length-n preference list)
//! - **Lookup**: O(log(n · v)) for the search, then a slice of the list
//! - **Build**: O(n² · v), dominated by writing out the preference lists

use crate::node::NodeIndex;
use crate::token::Token;

/// A virtual entry on the hash ring.
///
/// Ordering is `(token, node_index, copy)`: entries sort by token, and exact
/// token collisions fall back to node index then copy index so that build
/// output is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualEntry {
    /// Token position on the ring.
    pub token: Token,
    /// The physical node that owns this entry.
    pub node_index: NodeIndex,
    /// Which of the node's virtual copies this is (`0..vnodes`).
    pub copy: u32,
}

impl VirtualEntry {
    #[inline]
    pub fn new(token: Token, node_index: NodeIndex, copy: u32) -> Self {
        Self {
            token,
            node_index,
            copy,
        }
    }
}

impl std::fmt::Display for VirtualEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VEntry(token={}, node={}, copy={})",
            self.token, self.node_index, self.copy
        )
    }
}

/// Borrowed view of one ring position together with its preference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef<'a> {
    pub token: Token,
    pub node_index: NodeIndex,
    pub copy: u32,
    /// Every node index exactly once, `preference[0] == node_index`.
    pub preference: &'a [NodeIndex],
}
