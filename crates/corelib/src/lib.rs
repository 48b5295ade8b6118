//! Core library for consistent hashing implementation.
//!
//! This crate provides a consistent hash ring that maps a key to a ranked list
//! of physical nodes:
//! - Tokens and partitioners (key hashing)
//! - Node abstractions and virtual entries
//! - Ring building, with a full preference list per ring position
//! - Lookup, and hot-swapping rings on topology changes

pub mod config;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod topology;
pub mod vnode;

pub use config::{RingConfig, DEFAULT_VNODES};
pub use error::{Error, Result};
pub use node::{Node, NodeId, NodeIndex, RingNode};
pub use partitioner::{Partitioner, PartitionerKind};
pub use ring::{Ring, RingBuilder};
pub use token::Token;
pub use topology::{reassignments, Reassignment, SharedRing};
pub use vnode::{EntryRef, VirtualEntry};
