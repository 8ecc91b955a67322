use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic counter stamped on every persisted snapshot.
///
/// Each successful write stores `previous.next()`; a value is never reused.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(pub u64);

impl Version {
    /// Version of a board that has never been written.
    pub const INITIAL: Version = Version(0);

    /// The version the next write will carry. Stays at `u64::MAX` once reached.
    pub fn next(self) -> Version {
        Version(self.0.saturating_add(1))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Version(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_increments_by_one() {
        assert_eq!(Version::INITIAL.next(), Version(1));
        assert_eq!(Version(41).next().get(), 42);
        assert!(Version(3) < Version(3).next());
    }

    #[test]
    fn test_next_saturates_at_max() {
        assert_eq!(Version(u64::MAX).next(), Version(u64::MAX));
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&Version(7)).unwrap(), "7");
        let version: Version = serde_json::from_str("12").unwrap();
        assert_eq!(version, Version(12));
    }
}
