//! In-process store with the same semantics as [`SqliteStore`](super::SqliteStore).
//!
//! State sits behind one `RwLock`; a reorder validates every reference under
//! the write lock before touching any row, which gives the same
//! all-or-nothing behavior as a transaction.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::model::{
    Activity, Board, BoardId, Group, GroupId, Item, ItemId, NewActivity, UserId, Workspace,
    WorkspaceId,
};
use crate::ordering::{append_position, sort_by_position, ReorderBatch, Scope};

#[derive(Debug, Default)]
struct State {
    sessions: HashMap<String, UserId>,
    workspaces: HashMap<WorkspaceId, Workspace>,
    members: HashSet<(WorkspaceId, UserId)>,
    boards: HashMap<BoardId, Board>,
    groups: HashMap<GroupId, Group>,
    items: HashMap<ItemId, Item>,
    activity: Vec<Activity>,
}

impl State {
    fn next_position(&self, scope: &Scope) -> Result<i64, StoreError> {
        let siblings: Vec<i64> = match scope {
            Scope::Workspace(id) => self
                .boards
                .values()
                .filter(|b| &b.workspace_id == id)
                .map(|b| b.position)
                .collect(),
            Scope::Board(id) => self
                .groups
                .values()
                .filter(|g| &g.board_id == id)
                .map(|g| g.position)
                .collect(),
            Scope::Group(id) => self
                .items
                .values()
                .filter(|i| &i.group_id == id && i.parent_item_id.is_none())
                .map(|i| i.position)
                .collect(),
            Scope::Item(id) => self
                .items
                .values()
                .filter(|i| i.parent_item_id.as_ref() == Some(id))
                .map(|i| i.position)
                .collect(),
        };
        Ok(append_position(scope, siblings)?)
    }

    /// Check every reference of `batch` against `board` without writing.
    fn check_batch(&self, board: &BoardId, batch: &ReorderBatch) -> Result<(), StoreError> {
        match batch {
            ReorderBatch::Items(moves) => {
                for m in moves {
                    if let Some(group) = &m.group_id {
                        if !self.groups.get(group).is_some_and(|g| &g.board_id == board) {
                            return Err(StoreError::not_found("group", group.as_str()));
                        }
                    }
                    if !self.items.get(&m.id).is_some_and(|i| &i.board_id == board) {
                        return Err(StoreError::not_found("item", m.id.as_str()));
                    }
                }
            }
            ReorderBatch::Groups(moves) => {
                for m in moves {
                    if !self.groups.get(&m.id).is_some_and(|g| &g.board_id == board) {
                        return Err(StoreError::not_found("group", m.id.as_str()));
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_batch(&mut self, batch: &ReorderBatch) {
        match batch {
            ReorderBatch::Items(moves) => {
                for m in moves {
                    let Some(item) = self.items.get_mut(&m.id) else {
                        continue;
                    };
                    item.position = m.position;
                    // A subitem always sits in its parent's group.
                    let Some(group) = &m.group_id else {
                        continue;
                    };
                    if item.parent_item_id.is_some() {
                        continue;
                    }
                    item.group_id = group.clone();
                    for child in self.items.values_mut() {
                        if child.parent_item_id.as_ref() == Some(&m.id) {
                            child.group_id = group.clone();
                        }
                    }
                }
            }
            ReorderBatch::Groups(moves) => {
                for m in moves {
                    if let Some(group) = self.groups.get_mut(&m.id) {
                        group.position = m.position;
                    }
                }
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn resolve_session(&self, token: &str) -> Result<Option<UserId>, StoreError> {
        Ok(self.state.read().await.sessions.get(token).cloned())
    }

    async fn insert_session(&self, token: &str, user: &UserId) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .sessions
            .insert(token.to_string(), user.clone());
        Ok(())
    }

    async fn is_workspace_member(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<bool, StoreError> {
        let key = (workspace.clone(), user.clone());
        Ok(self.state.read().await.members.contains(&key))
    }

    async fn add_workspace_member(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.workspaces.contains_key(workspace) {
            return Err(StoreError::not_found("workspace", workspace.as_str()));
        }
        state.members.insert((workspace.clone(), user.clone()));
        Ok(())
    }

    async fn create_workspace(&self, name: &str, owner: &UserId) -> Result<Workspace, StoreError> {
        let workspace = Workspace {
            id: WorkspaceId::generate(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let mut state = self.state.write().await;
        state
            .members
            .insert((workspace.id.clone(), owner.clone()));
        state
            .workspaces
            .insert(workspace.id.clone(), workspace.clone());
        Ok(workspace)
    }

    async fn get_workspace(&self, id: &WorkspaceId) -> Result<Option<Workspace>, StoreError> {
        Ok(self.state.read().await.workspaces.get(id).cloned())
    }

    async fn next_position(&self, scope: &Scope) -> Result<i64, StoreError> {
        self.state.read().await.next_position(scope)
    }

    async fn create_board(&self, workspace: &WorkspaceId, name: &str) -> Result<Board, StoreError> {
        let mut state = self.state.write().await;
        if !state.workspaces.contains_key(workspace) {
            return Err(StoreError::not_found("workspace", workspace.as_str()));
        }
        let position = state.next_position(&Scope::Workspace(workspace.clone()))?;
        let board = Board {
            id: BoardId::generate(),
            workspace_id: workspace.clone(),
            name: name.to_string(),
            position,
            revision: 0,
            created_at: Utc::now(),
        };
        state.boards.insert(board.id.clone(), board.clone());
        Ok(board)
    }

    async fn get_board(&self, id: &BoardId) -> Result<Option<Board>, StoreError> {
        Ok(self.state.read().await.boards.get(id).cloned())
    }

    async fn list_boards(&self, workspace: &WorkspaceId) -> Result<Vec<Board>, StoreError> {
        let state = self.state.read().await;
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .filter(|b| &b.workspace_id == workspace)
            .cloned()
            .collect();
        sort_by_position(&mut boards);
        Ok(boards)
    }

    async fn create_group(&self, board: &BoardId, title: &str) -> Result<Group, StoreError> {
        let mut state = self.state.write().await;
        if !state.boards.contains_key(board) {
            return Err(StoreError::not_found("board", board.as_str()));
        }
        let position = state.next_position(&Scope::Board(board.clone()))?;
        let group = Group {
            id: GroupId::generate(),
            board_id: board.clone(),
            title: title.to_string(),
            position,
            created_at: Utc::now(),
        };
        state.groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    async fn get_group(&self, id: &GroupId) -> Result<Option<Group>, StoreError> {
        Ok(self.state.read().await.groups.get(id).cloned())
    }

    async fn list_groups(&self, board: &BoardId) -> Result<Vec<Group>, StoreError> {
        let state = self.state.read().await;
        let mut groups: Vec<Group> = state
            .groups
            .values()
            .filter(|g| &g.board_id == board)
            .cloned()
            .collect();
        sort_by_position(&mut groups);
        Ok(groups)
    }

    async fn create_item(&self, group: &GroupId, name: &str) -> Result<Item, StoreError> {
        let mut state = self.state.write().await;
        let board_id = state
            .groups
            .get(group)
            .map(|g| g.board_id.clone())
            .ok_or_else(|| StoreError::not_found("group", group.as_str()))?;
        let position = state.next_position(&Scope::Group(group.clone()))?;
        let item = Item {
            id: ItemId::generate(),
            board_id,
            group_id: group.clone(),
            parent_item_id: None,
            name: name.to_string(),
            position,
            created_at: Utc::now(),
        };
        state.items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn create_subitem(&self, parent: &ItemId, name: &str) -> Result<Item, StoreError> {
        let mut state = self.state.write().await;
        let (board_id, group_id) = state
            .items
            .get(parent)
            .map(|p| (p.board_id.clone(), p.group_id.clone()))
            .ok_or_else(|| StoreError::not_found("item", parent.as_str()))?;
        let position = state.next_position(&Scope::Item(parent.clone()))?;
        let item = Item {
            id: ItemId::generate(),
            board_id,
            group_id,
            parent_item_id: Some(parent.clone()),
            name: name.to_string(),
            position,
            created_at: Utc::now(),
        };
        state.items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn get_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.state.read().await.items.get(id).cloned())
    }

    async fn list_items(&self, board: &BoardId) -> Result<Vec<Item>, StoreError> {
        let state = self.state.read().await;
        let mut items: Vec<Item> = state
            .items
            .values()
            .filter(|i| &i.board_id == board)
            .cloned()
            .collect();
        sort_by_position(&mut items);
        Ok(items)
    }

    async fn reorder(
        &self,
        board: &BoardId,
        batch: &ReorderBatch,
        expected_revision: Option<i64>,
        audit: NewActivity,
    ) -> Result<i64, StoreError> {
        let mut state = self.state.write().await;
        let actual = state
            .boards
            .get(board)
            .map(|b| b.revision)
            .ok_or_else(|| StoreError::not_found("board", board.as_str()))?;
        if let Some(expected) = expected_revision.filter(|e| *e != actual) {
            return Err(StoreError::RevisionMismatch {
                board: board.to_string(),
                expected,
                actual,
            });
        }
        state.check_batch(board, batch)?;
        state.apply_batch(batch);

        let revision = actual.saturating_add(1);
        if let Some(b) = state.boards.get_mut(board) {
            b.revision = revision;
        }
        let id = state
            .activity
            .last()
            .map_or(1, |a| a.id.saturating_add(1));
        state.activity.push(Activity {
            id,
            board_id: audit.board_id,
            user_id: audit.user_id,
            action: audit.action,
            details: audit.details,
            created_at: Utc::now(),
        });
        Ok(revision)
    }

    async fn list_activity(
        &self,
        board: &BoardId,
        limit: usize,
    ) -> Result<Vec<Activity>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .activity
            .iter()
            .rev()
            .filter(|a| &a.board_id == board)
            .take(limit)
            .cloned()
            .collect())
    }
}
