//! Replication strategies for consistent hashing.
//!
//! This crate decides which nodes hold copies of a key, using the ranked
//! preference lists of a [`corelib::Ring`]:
//! - How many replicas to create
//! - Where to place replicas (which nodes), and where to fail over
//! - How many acknowledgements a consistency level needs

pub mod consistency;
pub mod error;
pub mod strategy;

pub use consistency::ConsistencyLevel;
pub use error::ReplicationError;
pub use strategy::{ReplicationStrategy, SimpleStrategy};
