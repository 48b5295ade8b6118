//! Ring construction.
//!
//! # Algorithm
//!
//! 1. **Expand**: one [`VirtualEntry`] per (node, copy), token =
//!    `partitioner.vnode_token(identity, copy)`.
//! 2. **Sort** by `(token, node_index, copy)`.
//! 3. **Base list**: scan the sorted entries and record each node the first
//!    time it appears. This ranking is the preference list of entry 0.
//! 4. **Rotate**: every other entry's list is the base list with the entry's
//!    own node moved to the front. Only that node changes rank: every other
//!    pair of nodes keeps its base order, so removing the entry's node from
//!    its list leaves exactly the base list without that node.
//! 5. **Verify** every list is a permutation starting with its own node.
//!
//! # Performance
//!
//! O(n² · v) time and space for n nodes and v vnodes per node. Builds are
//! expected on topology changes only; lookups never pay for them.

use crate::config::{RingConfig, DEFAULT_VNODES};
use crate::error::{Error, Result};
use crate::node::{NodeIndex, RingNode};
use crate::partitioner::{Partitioner, Xxh3Partitioner};
use crate::ring::Ring;
use crate::vnode::VirtualEntry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Upper bound on preference-table slots (`nodes² × vnodes`), about 16 GiB
/// of `NodeIndex` values.
pub const MAX_PREFERENCE_SLOTS: usize = u32::MAX as usize;

/// Builder for an immutable [`Ring`].
///
/// # Example
///
/// ```rust
/// use corelib::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_vnodes(8)
///     .add_node("10.0.0.1:7000")
///     .add_node("10.0.0.2:7000")
///     .build()
///     .unwrap();
///
/// assert_eq!(ring.entry_count(), 16);
/// assert_eq!(ring.lookup(b"my-key", 0).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder<N> {
    nodes: Vec<N>,
    vnodes: u32,
    partitioner: Arc<dyn Partitioner>,
}

impl<N> Default for RingBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> RingBuilder<N> {
    /// Builder with [`DEFAULT_VNODES`] and the XXH3 partitioner.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            vnodes: DEFAULT_VNODES,
            partitioner: Arc::new(Xxh3Partitioner),
        }
    }

    pub fn from_config(config: &RingConfig) -> Self {
        Self {
            nodes: Vec::new(),
            vnodes: config.vnodes,
            partitioner: config.partitioner.into_partitioner(),
        }
    }

    /// Set the number of virtual entries per node.
    pub fn with_vnodes(mut self, vnodes: u32) -> Self {
        self.vnodes = vnodes;
        self
    }

    pub fn with_partitioner(self, partitioner: impl Partitioner) -> Self {
        self.with_shared_partitioner(Arc::new(partitioner))
    }

    pub fn with_shared_partitioner(mut self, partitioner: Arc<dyn Partitioner>) -> Self {
        self.partitioner = partitioner;
        self
    }

    pub fn add_node(mut self, node: N) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn add_nodes(mut self, nodes: impl IntoIterator<Item = N>) -> Self {
        self.nodes.extend(nodes);
        self
    }
}

impl<N: RingNode> RingBuilder<N> {
    /// Build the ring.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if there are no nodes, `vnodes` is zero, or the
    ///   ring is too large to index.
    /// - [`Error::DuplicateIdentity`] if two nodes share a `hash_id`.
    /// - [`Error::InvariantViolation`] if a preference list fails
    ///   verification.
    pub fn build(self) -> Result<Ring<N>> {
        let RingBuilder {
            nodes,
            vnodes,
            partitioner,
        } = self;

        check_input(&nodes, vnodes)?;

        let mut entries = expand(&nodes, vnodes, partitioner.as_ref())?;
        entries.sort_unstable();

        let base = base_preference(&entries, nodes.len())?;
        let preferences = rotate_preferences(&entries, &base)?;
        verify_preferences(&entries, &preferences, nodes.len())?;

        debug!(
            nodes = nodes.len(),
            vnodes,
            entries = entries.len(),
            partitioner = partitioner.name(),
            "built ring"
        );

        Ok(Ring::from_parts(
            nodes,
            entries,
            preferences,
            vnodes,
            partitioner,
        ))
    }
}

fn check_input<N: RingNode>(nodes: &[N], vnodes: u32) -> Result<()> {
    if nodes.is_empty() {
        return Err(Error::Config("ring needs at least one node".into()));
    }
    if vnodes == 0 {
        return Err(Error::Config("vnodes must be at least 1".into()));
    }
    if NodeIndex::try_from(nodes.len()).is_err() {
        return Err(Error::Config(format!(
            "{} nodes exceed the maximum of {}",
            nodes.len(),
            NodeIndex::MAX
        )));
    }
    let slots = nodes
        .len()
        .checked_mul(vnodes as usize)
        .and_then(|entries| entries.checked_mul(nodes.len()));
    if !matches!(slots, Some(slots) if slots <= MAX_PREFERENCE_SLOTS) {
        return Err(Error::Config(format!(
            "{} nodes x {} vnodes is too large to index",
            nodes.len(),
            vnodes
        )));
    }

    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        if let Some(&first) = seen.get(node.hash_id()) {
            return Err(Error::DuplicateIdentity {
                identity: node.hash_id().to_owned(),
                first,
                second: index,
            });
        }
        seen.insert(node.hash_id(), index);
    }
    Ok(())
}

/// Reserve `additional` slots up front, turning allocation failure into a
/// config error instead of an abort.
fn reserve<T>(table: &mut Vec<T>, additional: usize) -> Result<()> {
    table.try_reserve_exact(additional).map_err(|err| {
        Error::Config(format!("cannot allocate {additional} ring slots: {err}"))
    })
}

fn expand<N: RingNode>(
    nodes: &[N],
    vnodes: u32,
    partitioner: &dyn Partitioner,
) -> Result<Vec<VirtualEntry>> {
    let mut entries = Vec::new();
    reserve(&mut entries, nodes.len() * vnodes as usize)?;
    let mut scratch = Vec::new();

    for (index, node) in nodes.iter().enumerate() {
        let identity = node.hash_id();
        for copy in 0..vnodes {
            let token = partitioner.vnode_token(identity, copy, &mut scratch);
            entries.push(VirtualEntry::new(token, index as NodeIndex, copy));
        }
    }

    Ok(entries)
}

/// Nodes in order of first appearance around the sorted ring.
fn base_preference(entries: &[VirtualEntry], node_count: usize) -> Result<Vec<NodeIndex>> {
    let mut seen = vec![false; node_count];
    let mut base = Vec::with_capacity(node_count);

    for entry in entries {
        let slot = &mut seen[entry.node_index as usize];
        if !*slot {
            *slot = true;
            base.push(entry.node_index);
            if base.len() == node_count {
                break;
            }
        }
    }

    if base.len() != node_count {
        return Err(Error::InvariantViolation(format!(
            "base preference list covers {} of {} nodes",
            base.len(),
            node_count
        )));
    }
    Ok(base)
}

/// Flat preference table: entry `i` owns `[i * n, (i + 1) * n)`.
///
/// Each list is `[base[idx]] + base[..idx] + base[idx + 1..]` where `idx` is
/// the rank of the entry's node in `base`.
fn rotate_preferences(entries: &[VirtualEntry], base: &[NodeIndex]) -> Result<Vec<NodeIndex>> {
    let node_count = base.len();

    let mut rank = vec![0usize; node_count];
    for (r, &node) in base.iter().enumerate() {
        rank[node as usize] = r;
    }

    let mut preferences = Vec::new();
    reserve(&mut preferences, entries.len() * node_count)?;
    for entry in entries {
        let idx = rank[entry.node_index as usize];
        preferences.push(base[idx]);
        preferences.extend_from_slice(&base[..idx]);
        preferences.extend_from_slice(&base[idx + 1..]);
    }
    Ok(preferences)
}

fn verify_preferences(
    entries: &[VirtualEntry],
    preferences: &[NodeIndex],
    node_count: usize,
) -> Result<()> {
    if preferences.len() != entries.len() * node_count {
        return Err(Error::InvariantViolation(format!(
            "preference table has {} slots, expected {}",
            preferences.len(),
            entries.len() * node_count
        )));
    }

    // marks[node] == position + 1 once `node` was seen in list `position`.
    let mut marks = vec![0usize; node_count];
    for (position, (entry, preference)) in entries
        .iter()
        .zip(preferences.chunks_exact(node_count))
        .enumerate()
    {
        if preference[0] != entry.node_index {
            return Err(Error::InvariantViolation(format!(
                "entry {position} ranks node {} first instead of its own node {}",
                preference[0], entry.node_index
            )));
        }

        let stamp = position + 1;
        for &node in preference {
            match marks.get_mut(node as usize) {
                Some(mark) if *mark != stamp => *mark = stamp,
                Some(_) => {
                    return Err(Error::InvariantViolation(format!(
                        "entry {position} lists node {node} twice"
                    )))
                }
                None => {
                    return Err(Error::InvariantViolation(format!(
                        "entry {position} lists unknown node {node}"
                    )))
                }
            }
        }
    }
    Ok(())
}
