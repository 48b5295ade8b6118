//! Ring tokens.
//!
//! A token is a position in the 64-bit hash space. Virtual entries are placed
//! at tokens, and lookup keys are hashed to tokens in the same space.

use std::fmt;

/// Position on the ring in the 64-bit hash space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Token(pub u64);

impl Token {
    /// Minimum token value (start of ring).
    pub const fn zero() -> Self {
        Token(0)
    }

    /// Maximum token value (end of ring).
    pub const fn max() -> Self {
        Token(u64::MAX)
    }

    /// Builds a token from the first eight bytes of a digest, big-endian.
    ///
    /// A digest shorter than eight bytes is zero-padded on the right.
    pub fn from_digest_prefix(digest: &[u8]) -> Self {
        let mut prefix = [0u8; 8];
        let len = digest.len().min(8);
        prefix[..len].copy_from_slice(&digest[..len]);
        Token(u64::from_be_bytes(prefix))
    }

    /// Clockwise distance from `self` to `other` on the ring.
    ///
    /// `Token(5).distance_to(&Token(5))` is zero, not a full turn.
    pub fn distance_to(&self, other: &Self) -> u64 {
        other.0.wrapping_sub(self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_wraps() {
        assert_eq!(Token(100).distance_to(&Token(200)), 100);
        assert_eq!(Token::max().distance_to(&Token::zero()), 1);
        assert_eq!(Token(200).distance_to(&Token(100)), u64::MAX - 99);
    }

    #[test]
    fn test_from_digest_prefix() {
        let digest = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xff];
        assert_eq!(
            Token::from_digest_prefix(&digest),
            Token(0x0102_0304_0506_0708)
        );
        assert_eq!(
            Token::from_digest_prefix(&digest[..4]),
            Token(0x0102_0304_0000_0000)
        );
    }

    #[test]
    fn test_display_is_fixed_width_hex() {
        assert_eq!(Token(0xab).to_string(), "00000000000000ab");
    }
}
