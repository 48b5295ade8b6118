//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting keys into tokens
//! that can be placed on the hash ring.

pub mod digest;
pub mod kind;
pub mod sip;
pub mod traits;
pub mod xxh3;

pub use digest::Blake3Partitioner;
pub use kind::PartitionerKind;
pub use sip::SipPartitioner;
pub use traits::Partitioner;
pub use xxh3::Xxh3Partitioner;
