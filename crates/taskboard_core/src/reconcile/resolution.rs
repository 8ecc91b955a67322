//! How an editor settles a reported conflict.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How to resolve a conflict.
///
/// There is no automatic merge: the editor either keeps their own board or
/// takes the stored one wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictResolution {
    /// Keep the local version, overwrite remote
    KeepLocal,

    /// Discard local edits and adopt the remote board
    KeepRemote,
}

impl FromStr for ConflictResolution {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "keep_local" | "keep-local" => Ok(ConflictResolution::KeepLocal),
            "remote" | "keep_remote" | "keep-remote" => Ok(ConflictResolution::KeepRemote),
            _ => Err(()),
        }
    }
}

impl ConflictResolution {
    /// Check if this resolution writes to the store
    pub fn writes(&self) -> bool {
        matches!(self, ConflictResolution::KeepLocal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_resolution_from_str() {
        assert_eq!(
            ConflictResolution::from_str("local"),
            Ok(ConflictResolution::KeepLocal)
        );
        assert_eq!(
            ConflictResolution::from_str("Keep-Remote"),
            Ok(ConflictResolution::KeepRemote)
        );
        assert_eq!(
            ConflictResolution::from_str("keep_local"),
            Ok(ConflictResolution::KeepLocal)
        );
        assert!(ConflictResolution::from_str("merge").is_err());
    }

    #[test]
    fn test_only_keep_local_writes() {
        assert!(ConflictResolution::KeepLocal.writes());
        assert!(!ConflictResolution::KeepRemote.writes());
    }
}
