//! Bulk reorder batches.
//!
//! A batch is the complete new order the client computed after a drag and
//! drop gesture. Stores apply it as one all-or-nothing unit and append a
//! single audit record summarizing it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::error::OrderingError;
use crate::model::{GroupId, ItemId};

/// Audit action recorded once per applied reorder.
pub const REORDER_ACTION: &str = "board.reordered";

/// Which sibling collection a reorder targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderKind {
    Items,
    Groups,
}

impl ReorderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReorderKind::Items => "items",
            ReorderKind::Groups => "groups",
        }
    }
}

impl fmt::Display for ReorderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReorderKind {
    type Err = OrderingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "items" => Ok(ReorderKind::Items),
            "groups" => Ok(ReorderKind::Groups),
            other => Err(OrderingError::UnknownKind(other.to_string())),
        }
    }
}

/// New position for one item, optionally moving it to another group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMove {
    pub id: ItemId,
    pub position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

/// New position for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMove {
    pub id: GroupId,
    pub position: i64,
}

/// A validated set of position overwrites for one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderBatch {
    Items(Vec<ItemMove>),
    Groups(Vec<GroupMove>),
}

impl ReorderBatch {
    /// Build a batch of `kind` from whichever array matches it.
    ///
    /// The array of the other kind is ignored. A missing array yields an
    /// empty batch.
    pub fn new(
        kind: ReorderKind,
        items: Option<Vec<ItemMove>>,
        groups: Option<Vec<GroupMove>>,
    ) -> Result<Self, OrderingError> {
        let batch = match kind {
            ReorderKind::Items => ReorderBatch::Items(items.unwrap_or_default()),
            ReorderKind::Groups => ReorderBatch::Groups(groups.unwrap_or_default()),
        };
        batch.validate()?;
        Ok(batch)
    }

    #[must_use]
    pub fn kind(&self) -> ReorderKind {
        match self {
            ReorderBatch::Items(_) => ReorderKind::Items,
            ReorderBatch::Groups(_) => ReorderKind::Groups,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ReorderBatch::Items(moves) => moves.len(),
            ReorderBatch::Groups(moves) => moves.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ids(&self) -> Vec<&str> {
        match self {
            ReorderBatch::Items(moves) => moves.iter().map(|m| m.id.as_str()).collect(),
            ReorderBatch::Groups(moves) => moves.iter().map(|m| m.id.as_str()).collect(),
        }
    }

    /// Reject ids listed twice.
    ///
    /// Positions themselves are overwritten as given, negative values
    /// included. Refusing a repeated id is a deliberate tightening of that
    /// overwrite: the entry has no single meaning, so the last one does not
    /// silently win. Uniqueness and
    /// density of the resulting position set are not checked: the batch may
    /// cover only part of the scope.
    pub fn validate(&self) -> Result<(), OrderingError> {
        let mut seen = HashSet::new();
        for id in self.ids() {
            if !seen.insert(id) {
                return Err(OrderingError::DuplicateEntity(id.to_string()));
            }
        }
        Ok(())
    }

    /// JSON details stored on the audit record.
    #[must_use]
    pub fn summary(&self) -> serde_json::Value {
        let entries = match self {
            ReorderBatch::Items(moves) => serde_json::to_value(moves),
            ReorderBatch::Groups(moves) => serde_json::to_value(moves),
        }
        .unwrap_or(serde_json::Value::Null);
        serde_json::json!({
            "type": self.kind().as_str(),
            "count": self.len(),
            "entries": entries,
        })
    }
}

#[cfg(test)]
#[path = "reorder_tests.rs"]
mod reorder_tests;
