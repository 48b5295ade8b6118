//! Core partitioner trait definitions.

use crate::token::Token;
use std::fmt::Debug;

/// A partitioner converts keys into tokens for placement on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// token generation without synchronization overhead. The same partitioner
/// must be used to place virtual entries and to resolve lookup keys.
pub trait Partitioner: Send + Sync + Debug + 'static {
    /// Converts a key into a token.
    fn token(&self, key: &[u8]) -> Token;

    /// Token of virtual copy `copy` of the node identified by `identity`.
    ///
    /// The hashed input is the identity bytes followed by `copy` as four
    /// big-endian bytes. The suffix has a fixed width, so two different copy
    /// indices never produce the same input. `scratch` is reused between
    /// calls to avoid an allocation per entry.
    fn vnode_token(&self, identity: &str, copy: u32, scratch: &mut Vec<u8>) -> Token {
        scratch.clear();
        scratch.extend_from_slice(identity.as_bytes());
        scratch.extend_from_slice(&copy.to_be_bytes());
        self.token(scratch)
    }

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
