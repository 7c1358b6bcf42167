use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BoardId, GroupId, ItemId, UserId, WorkspaceId};
use crate::ordering::Positioned;

/// A tenant: owns boards and a member list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A board, ordered among the boards of its workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub position: i64,
    /// Number of bulk reorders applied to this board.
    pub revision: i64,
    pub created_at: DateTime<Utc>,
}

/// A group of items, ordered among the groups of its board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub board_id: BoardId,
    pub title: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

/// An item or, when `parent_item_id` is set, a subitem.
///
/// Top-level items are ordered within their group; subitems within their
/// parent item. A subitem carries its parent's board and group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub board_id: BoardId,
    pub group_id: GroupId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_item_id: Option<ItemId>,
    pub name: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

/// One audit-log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub board_id: BoardId,
    pub user_id: UserId,
    pub action: String,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Audit record not yet persisted; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub board_id: BoardId,
    pub user_id: UserId,
    pub action: String,
    pub details: serde_json::Value,
}

impl Positioned for Board {
    fn position(&self) -> i64 {
        self.position
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn tiebreak_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Positioned for Group {
    fn position(&self) -> i64 {
        self.position
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn tiebreak_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Positioned for Item {
    fn position(&self) -> i64 {
        self.position
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn tiebreak_id(&self) -> &str {
        self.id.as_str()
    }
}
