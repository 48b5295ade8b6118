//! Node abstractions for the consistent hash ring.
//!
//! The ring never owns node identity itself: it only asks each node for a
//! stable, unique string via [`RingNode::hash_id`] and refers to nodes by
//! their position in the input list afterwards.

use std::fmt;
use std::sync::Arc;

/// Index of a physical node inside a ring's node table.
pub type NodeIndex = u32;

/// Anything that can be placed on the ring.
///
/// `hash_id` must be stable for the lifetime of the node and unique across
/// the node set (for example `"10.0.0.7:7000"`).
pub trait RingNode {
    /// The identity hashed to place this node's virtual entries.
    fn hash_id(&self) -> &str;
}

impl RingNode for String {
    fn hash_id(&self) -> &str {
        self
    }
}

impl RingNode for &str {
    fn hash_id(&self) -> &str {
        self
    }
}

impl<T: RingNode + ?Sized> RingNode for Arc<T> {
    fn hash_id(&self) -> &str {
        (**self).hash_id()
    }
}

impl<T: RingNode + ?Sized> RingNode for Box<T> {
    fn hash_id(&self) -> &str {
        (**self).hash_id()
    }
}

/// Compact identifier for a node in the cluster.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub u128);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Logical node participating in the ring.
///
/// Keep this struct small and cheap to clone; heavy mutable state (connections,
/// metrics, etc.) should live elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    pub id: NodeId,
    /// Unique address such as `host:port`. Used as the hash identity.
    pub addr: String,
}

impl Node {
    /// Construct a new node.
    pub fn new(id: NodeId, addr: impl Into<String>) -> Self {
        Self {
            id,
            addr: addr.into(),
        }
    }
}

impl RingNode for Node {
    fn hash_id(&self) -> &str {
        &self.addr
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_identity_is_addr() {
        let node = Node::new(NodeId(7), "10.0.0.7:7000");
        assert_eq!(node.hash_id(), "10.0.0.7:7000");
        assert_eq!(
            node.to_string(),
            format!("{:032x}@10.0.0.7:7000", 7)
        );
        assert!(node.to_string().starts_with(&node.id.to_string()));
    }

    #[test]
    fn test_shared_nodes_forward_identity() {
        let node = Arc::new(Node::new(NodeId(1), "a:1"));
        assert_eq!(node.hash_id(), "a:1");
        assert_eq!("b:2".hash_id(), "b:2");
        assert_eq!(String::from("c:3").hash_id(), "c:3");
    }
}
