//! Interned identifiers for catalog entries

use serde::{Deserialize, Serialize};

/// Identifier of a state in the state catalog.
///
/// Ids are dense: a catalog of `n` states hands out `StateId(0)..StateId(n)`
/// in canonical enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for StateId {
    fn from(index: usize) -> Self {
        Self(index as u32)
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Identifier of an action in the action catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionId(pub u32);

impl ActionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for ActionId {
    fn from(index: usize) -> Self {
        Self(index as u32)
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_index_roundtrip() {
        assert_eq!(StateId::from(7).index(), 7);
        assert_eq!(ActionId::from(3).index(), 3);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(StateId(2).to_string(), "s2");
        assert_eq!(ActionId(14).to_string(), "a14");
    }

    #[test]
    fn test_id_ordering() {
        assert!(StateId(1) < StateId(2));
        assert!(ActionId(0) < ActionId(10));
    }
}
