//! Consistency levels for replicated reads and writes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many replicas must acknowledge an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyLevel {
    /// A single replica.
    One,
    /// A strict majority of replicas.
    Quorum,
    /// Every replica.
    All,
}

impl ConsistencyLevel {
    /// Acknowledgements required out of `replication_factor` replicas.
    ///
    /// Never exceeds `replication_factor`; zero only when it is zero.
    pub fn required_acks(&self, replication_factor: usize) -> usize {
        match self {
            ConsistencyLevel::One => replication_factor.min(1),
            ConsistencyLevel::Quorum => replication_factor / 2 + usize::from(replication_factor > 0),
            ConsistencyLevel::All => replication_factor,
        }
    }

    /// True if `acks` acknowledgements satisfy this level.
    pub fn is_satisfied(&self, acks: usize, replication_factor: usize) -> bool {
        acks >= self.required_acks(replication_factor)
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConsistencyLevel::One => "one",
            ConsistencyLevel::Quorum => "quorum",
            ConsistencyLevel::All => "all",
        })
    }
}

impl FromStr for ConsistencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "one" => Ok(ConsistencyLevel::One),
            "quorum" => Ok(ConsistencyLevel::Quorum),
            "all" => Ok(ConsistencyLevel::All),
            other => Err(format!(
                "unknown consistency level {other:?} (expected one, quorum or all)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_acks() {
        assert_eq!(ConsistencyLevel::One.required_acks(3), 1);
        assert_eq!(ConsistencyLevel::Quorum.required_acks(3), 2);
        assert_eq!(ConsistencyLevel::Quorum.required_acks(4), 3);
        assert_eq!(ConsistencyLevel::Quorum.required_acks(1), 1);
        assert_eq!(ConsistencyLevel::All.required_acks(5), 5);
        assert_eq!(ConsistencyLevel::Quorum.required_acks(0), 0);
        assert_eq!(ConsistencyLevel::One.required_acks(0), 0);
    }

    #[test]
    fn test_is_satisfied() {
        assert!(ConsistencyLevel::Quorum.is_satisfied(2, 3));
        assert!(!ConsistencyLevel::All.is_satisfied(2, 3));
    }

    #[test]
    fn test_parse() {
        assert_eq!("QUORUM".parse::<ConsistencyLevel>(), Ok(ConsistencyLevel::Quorum));
        assert_eq!(ConsistencyLevel::All.to_string(), "all");
        assert!("two".parse::<ConsistencyLevel>().is_err());
    }
}
