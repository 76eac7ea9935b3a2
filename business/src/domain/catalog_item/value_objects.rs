use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::ItemError;

/// Identifier of a catalog item in the record store.
///
/// Only UUIDs are valid record store identifiers, so any string that does not
/// parse is rejected before it reaches a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ItemError::InvalidId)
    }
}

/// Numeric item attributes the record store can rank by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAttribute {
    RankingScore,
    AvailableQuantity,
}

impl std::fmt::Display for SortAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortAttribute::RankingScore => write!(f, "ranking_score"),
            SortAttribute::AvailableQuantity => write!(f, "available_quantity"),
        }
    }
}
