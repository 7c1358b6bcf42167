//! Persistence behind a repository interface.
//!
//! Handlers only see `Arc<dyn Store>`. [`SqliteStore`] is the relational
//! backend used by the daemon; [`MemoryStore`] is an in-process fake with the
//! same semantics for tests.

mod error;
mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::model::{
    Activity, Board, BoardId, Group, GroupId, Item, ItemId, NewActivity, UserId, Workspace,
    WorkspaceId,
};
use crate::ordering::{ReorderBatch, Scope};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Default number of activity records returned by [`Store::list_activity`].
pub const DEFAULT_ACTIVITY_LIMIT: usize = 50;
/// Hard cap on activity records per request.
pub const MAX_ACTIVITY_LIMIT: usize = 500;

#[async_trait]
pub trait Store: Send + Sync {
    /// Resolve a bearer token issued by the auth service.
    async fn resolve_session(&self, token: &str) -> Result<Option<UserId>, StoreError>;

    /// Record a session. Used by the auth service and by tests.
    async fn insert_session(&self, token: &str, user: &UserId) -> Result<(), StoreError>;

    async fn is_workspace_member(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<bool, StoreError>;

    async fn add_workspace_member(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<(), StoreError>;

    /// Create a workspace with `owner` as its first member.
    async fn create_workspace(&self, name: &str, owner: &UserId) -> Result<Workspace, StoreError>;

    async fn get_workspace(&self, id: &WorkspaceId) -> Result<Option<Workspace>, StoreError>;

    /// Position the next entity appended to `scope` would receive.
    async fn next_position(&self, scope: &Scope) -> Result<i64, StoreError>;

    /// Append a board to `workspace`.
    async fn create_board(&self, workspace: &WorkspaceId, name: &str) -> Result<Board, StoreError>;

    async fn get_board(&self, id: &BoardId) -> Result<Option<Board>, StoreError>;

    /// Boards of a workspace in display order.
    async fn list_boards(&self, workspace: &WorkspaceId) -> Result<Vec<Board>, StoreError>;

    /// Append a group to `board`.
    async fn create_group(&self, board: &BoardId, title: &str) -> Result<Group, StoreError>;

    async fn get_group(&self, id: &GroupId) -> Result<Option<Group>, StoreError>;

    /// Groups of a board in display order.
    async fn list_groups(&self, board: &BoardId) -> Result<Vec<Group>, StoreError>;

    /// Append a top-level item to `group`.
    async fn create_item(&self, group: &GroupId, name: &str) -> Result<Item, StoreError>;

    /// Append a subitem under `parent`.
    async fn create_subitem(&self, parent: &ItemId, name: &str) -> Result<Item, StoreError>;

    async fn get_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError>;

    /// Items and subitems of a board in display order.
    async fn list_items(&self, board: &BoardId) -> Result<Vec<Item>, StoreError>;

    /// Apply `batch` to `board` as one atomic unit and append `audit`.
    ///
    /// Every referenced entity must exist on `board`; otherwise nothing is
    /// written. When `expected_revision` is given it must match the board's
    /// current revision. Returns the board's new revision.
    async fn reorder(
        &self,
        board: &BoardId,
        batch: &ReorderBatch,
        expected_revision: Option<i64>,
        audit: NewActivity,
    ) -> Result<i64, StoreError>;

    /// Audit records of a board, newest first.
    async fn list_activity(&self, board: &BoardId, limit: usize)
        -> Result<Vec<Activity>, StoreError>;
}
