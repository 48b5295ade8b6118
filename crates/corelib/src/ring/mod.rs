//! Consistent hash ring implementation.
//!
//! [`RingBuilder`] expands nodes into sorted virtual entries and derives a
//! preference list for each one; the resulting [`Ring`] is immutable and
//! answers lookups with a binary search.

pub mod builder;
pub mod position;
pub mod ring;

pub use builder::RingBuilder;
pub use position::successor;
pub use ring::Ring;
