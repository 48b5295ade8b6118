//! Digest-prefix partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::token::Token;

/// BLAKE3 partitioner: the token is the first eight bytes of the digest,
/// read big-endian.
///
/// Slower than [`Xxh3Partitioner`](super::Xxh3Partitioner); useful when ring
/// placement has to agree with another system that positions by digest
/// prefix.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Partitioner;

impl Partitioner for Blake3Partitioner {
    fn token(&self, key: &[u8]) -> Token {
        Token::from_digest_prefix(blake3::hash(key).as_bytes())
    }

    fn name(&self) -> &'static str {
        "Blake3Partitioner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_digest_prefix() {
        let digest = blake3::hash(b"node-a");
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest.as_bytes()[..8]);
        assert_eq!(
            Blake3Partitioner.token(b"node-a"),
            Token(u64::from_be_bytes(prefix))
        );
    }
}
