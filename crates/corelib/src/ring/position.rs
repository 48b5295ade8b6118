//! Key-to-position resolution.

use crate::token::Token;
use crate::vnode::VirtualEntry;

/// Index of the first entry whose token is `>= token`, wrapping to `0` when
/// `token` lies past the last entry.
///
/// `entries` must be sorted by token. Returns `0` for an empty slice; callers
/// index with the result only when entries exist.
#[inline]
pub fn successor(entries: &[VirtualEntry], token: Token) -> usize {
    let idx = entries.partition_point(|entry| entry.token < token);
    if idx == entries.len() {
        0
    } else {
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(tokens: &[u64]) -> Vec<VirtualEntry> {
        tokens
            .iter()
            .enumerate()
            .map(|(i, &t)| VirtualEntry::new(Token(t), i as u32, 0))
            .collect()
    }

    #[test]
    fn test_exact_match_selects_entry() {
        let e = entries(&[10, 20, 30]);
        assert_eq!(successor(&e, Token(20)), 1);
    }

    #[test]
    fn test_between_selects_next() {
        let e = entries(&[10, 20, 30]);
        assert_eq!(successor(&e, Token(0)), 0);
        assert_eq!(successor(&e, Token(11)), 1);
        assert_eq!(successor(&e, Token(29)), 2);
    }

    #[test]
    fn test_past_last_wraps_to_first() {
        let e = entries(&[10, 20, 30]);
        assert_eq!(successor(&e, Token(31)), 0);
        assert_eq!(successor(&e, Token::max()), 0);
    }

    #[test]
    fn test_collision_selects_first_of_run() {
        let e = entries(&[10, 20, 20, 30]);
        assert_eq!(successor(&e, Token(15)), 1);
        assert_eq!(successor(&e, Token(20)), 1);
    }

    #[test]
    fn test_empty() {
        assert_eq!(successor(&[], Token(5)), 0);
    }
}
