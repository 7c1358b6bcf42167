//! Append positions and display order for sibling records.

use chrono::{DateTime, Utc};
use std::fmt;

use super::error::OrderingError;
use crate::model::{BoardId, GroupId, ItemId, WorkspaceId};

/// Position given to the first entity of an empty scope, for every entity kind.
pub const BASELINE_POSITION: i64 = 0;

/// The sibling set an ordered entity belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Boards of a workspace.
    Workspace(WorkspaceId),
    /// Groups of a board.
    Board(BoardId),
    /// Top-level items of a group.
    Group(GroupId),
    /// Subitems of an item.
    Item(ItemId),
}

impl Scope {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Scope::Workspace(_) => "workspace",
            Scope::Board(_) => "board",
            Scope::Group(_) => "group",
            Scope::Item(_) => "item",
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Scope::Workspace(id) => id.as_str(),
            Scope::Board(id) => id.as_str(),
            Scope::Group(id) => id.as_str(),
            Scope::Item(id) => id.as_str(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.key())
    }
}

/// Compute the position for a new entity appended to `scope`.
///
/// Returns [`BASELINE_POSITION`] when the scope is empty, otherwise one past
/// the largest sibling position.
pub fn append_position<I>(scope: &Scope, siblings: I) -> Result<i64, OrderingError>
where
    I: IntoIterator<Item = i64>,
{
    match siblings.into_iter().max() {
        None => Ok(BASELINE_POSITION),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| OrderingError::PositionOverflow(scope.to_string())),
    }
}

/// Records that take part in a sibling ordering.
pub trait Positioned {
    fn position(&self) -> i64;
    fn created_at(&self) -> DateTime<Utc>;
    fn tiebreak_id(&self) -> &str;
}

/// Sort siblings into display order.
///
/// Ascending position; equal positions (possible after a reorder that
/// submitted duplicates) fall back to creation time, then id, so iteration
/// stays stable.
pub fn sort_by_position<T: Positioned>(entities: &mut [T]) {
    entities.sort_by(|a, b| {
        a.position()
            .cmp(&b.position())
            .then_with(|| a.created_at().cmp(&b.created_at()))
            .then_with(|| a.tiebreak_id().cmp(b.tiebreak_id()))
    });
}
