use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a stored entity.
///
/// Wraps a 64-bit integer so entity ids cannot be mixed up with
/// quantities or other plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Creates an id from its raw value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns the id that follows this one in a sequence.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl FromStr for EntityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_next_increments() {
        assert_eq!(EntityId::new(1).next(), EntityId::new(2));
    }

    #[test]
    fn entity_id_parses_from_path_segment() {
        assert_eq!("42".parse::<EntityId>().unwrap(), EntityId::new(42));
        assert!("abc".parse::<EntityId>().is_err());
    }

    #[test]
    fn entity_id_serializes_as_bare_number() {
        let json = serde_json::to_string(&EntityId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: EntityId = serde_json::from_str("7").unwrap();
        assert_eq!(back, EntityId::new(7));
    }
}
