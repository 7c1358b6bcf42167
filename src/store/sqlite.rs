//! Relational store on a single SQLite connection.
//!
//! The connection lives behind a mutex and every operation runs on the
//! blocking pool. Each write is one transaction: append positions are
//! computed and inserted under the same lock, and a reorder either commits
//! every row plus its audit record or nothing.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::{Store, StoreError};
use crate::model::{
    Activity, Board, BoardId, Group, GroupId, Item, ItemId, NewActivity, UserId, Workspace,
    WorkspaceId,
};
use crate::ordering::{append_position, sort_by_position, ReorderBatch, Scope};

const SCHEMA_VERSION: &str = "1";

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS meta (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
  token TEXT PRIMARY KEY,
  user_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workspaces (
  id TEXT PRIMARY KEY,
  name TEXT NOT NULL,
  created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workspace_members (
  workspace_id TEXT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
  user_id TEXT NOT NULL,
  PRIMARY KEY (workspace_id, user_id)
);

CREATE TABLE IF NOT EXISTS boards (
  id TEXT PRIMARY KEY,
  workspace_id TEXT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  position INTEGER NOT NULL,
  revision INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_boards_scope ON boards(workspace_id, position);

CREATE TABLE IF NOT EXISTS board_groups (
  id TEXT PRIMARY KEY,
  board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
  title TEXT NOT NULL,
  position INTEGER NOT NULL,
  created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_groups_scope ON board_groups(board_id, position);

CREATE TABLE IF NOT EXISTS items (
  id TEXT PRIMARY KEY,
  board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
  group_id TEXT NOT NULL REFERENCES board_groups(id) ON DELETE CASCADE,
  parent_item_id TEXT REFERENCES items(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  position INTEGER NOT NULL,
  created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_items_group_scope ON items(group_id, parent_item_id, position);
CREATE INDEX IF NOT EXISTS idx_items_parent_scope ON items(parent_item_id, position);
CREATE INDEX IF NOT EXISTS idx_items_board ON items(board_id);

CREATE TABLE IF NOT EXISTS activity_log (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  board_id TEXT NOT NULL,
  user_id TEXT NOT NULL,
  action TEXT NOT NULL,
  details TEXT NOT NULL,
  created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_activity_board ON activity_log(board_id, id);
";

const BOARD_COLUMNS: &str = "id, workspace_id, name, position, revision, created_at";
const GROUP_COLUMNS: &str = "id, board_id, title, position, created_at";
const ITEM_COLUMNS: &str = "id, board_id, group_id, parent_item_id, name, position, created_at";

#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;\nPRAGMA synchronous=NORMAL;")?;
        migrate(&conn)?;
        info!(path = %path.display(), "Opened SQLite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// Private in-memory database, gone when the store is dropped.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Worker("connection mutex poisoned".to_string()))?;
            op(&mut *guard)
        })
        .await
        .map_err(|e| StoreError::Worker(e.to_string()))?
    }
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    conn.execute_batch(SCHEMA)?;
    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION],
    )?;
    Ok(())
}

fn board_from_row(row: &Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: BoardId::from(row.get::<_, String>("id")?),
        workspace_id: WorkspaceId::from(row.get::<_, String>("workspace_id")?),
        name: row.get("name")?,
        position: row.get("position")?,
        revision: row.get("revision")?,
        created_at: row.get("created_at")?,
    })
}

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: GroupId::from(row.get::<_, String>("id")?),
        board_id: BoardId::from(row.get::<_, String>("board_id")?),
        title: row.get("title")?,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
    })
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: ItemId::from(row.get::<_, String>("id")?),
        board_id: BoardId::from(row.get::<_, String>("board_id")?),
        group_id: GroupId::from(row.get::<_, String>("group_id")?),
        parent_item_id: row.get::<_, Option<String>>("parent_item_id")?.map(ItemId::from),
        name: row.get("name")?,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
    })
}

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get("id")?,
        board_id: BoardId::from(row.get::<_, String>("board_id")?),
        user_id: UserId::from(row.get::<_, String>("user_id")?),
        action: row.get("action")?,
        details: row.get("details")?,
        created_at: row.get("created_at")?,
    })
}

fn get_board(conn: &Connection, id: &str) -> Result<Option<Board>, StoreError> {
    let sql = format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], board_from_row).optional()?)
}

fn get_group(conn: &Connection, id: &str) -> Result<Option<Group>, StoreError> {
    let sql = format!("SELECT {GROUP_COLUMNS} FROM board_groups WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], group_from_row).optional()?)
}

fn get_item(conn: &Connection, id: &str) -> Result<Option<Item>, StoreError> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], item_from_row).optional()?)
}

fn exists(conn: &Connection, sql: &str, key: &str) -> Result<bool, StoreError> {
    Ok(conn.query_row(sql, params![key], |_| Ok(())).optional()?.is_some())
}

/// Append position for `scope`, read inside the caller's transaction.
fn next_position_tx(conn: &Connection, scope: &Scope) -> Result<i64, StoreError> {
    let sql = match scope {
        Scope::Workspace(_) => "SELECT MAX(position) FROM boards WHERE workspace_id = ?1",
        Scope::Board(_) => "SELECT MAX(position) FROM board_groups WHERE board_id = ?1",
        Scope::Group(_) => {
            "SELECT MAX(position) FROM items WHERE group_id = ?1 AND parent_item_id IS NULL"
        }
        Scope::Item(_) => "SELECT MAX(position) FROM items WHERE parent_item_id = ?1",
    };
    let max: Option<i64> = conn.query_row(sql, params![scope.key()], |row| row.get(0))?;
    Ok(append_position(scope, max)?)
}

fn insert_item(conn: &Connection, item: &Item) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO items(id, board_id, group_id, parent_item_id, name, position, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            item.id.as_str(),
            item.board_id.as_str(),
            item.group_id.as_str(),
            item.parent_item_id.as_ref().map(ItemId::as_str),
            item.name,
            item.position,
            item.created_at,
        ],
    )?;
    Ok(())
}

fn apply_batch(conn: &Connection, board: &BoardId, batch: &ReorderBatch) -> Result<(), StoreError> {
    match batch {
        ReorderBatch::Items(moves) => {
            for m in moves {
                if let Some(group) = &m.group_id {
                    let on_board = conn
                        .query_row(
                            "SELECT 1 FROM board_groups WHERE id = ?1 AND board_id = ?2",
                            params![group.as_str(), board.as_str()],
                            |_| Ok(()),
                        )
                        .optional()?
                        .is_some();
                    if !on_board {
                        return Err(StoreError::not_found("group", group.as_str()));
                    }
                }
                let changed = conn.execute(
                    "UPDATE items SET position = ?1 WHERE id = ?2 AND board_id = ?3",
                    params![m.position, m.id.as_str(), board.as_str()],
                )?;
                if changed == 0 {
                    return Err(StoreError::not_found("item", m.id.as_str()));
                }
                let Some(group) = &m.group_id else {
                    continue;
                };
                // A subitem always sits in its parent's group.
                let moved = conn.execute(
                    "UPDATE items SET group_id = ?1 WHERE id = ?2 AND parent_item_id IS NULL",
                    params![group.as_str(), m.id.as_str()],
                )?;
                if moved > 0 {
                    conn.execute(
                        "UPDATE items SET group_id = ?1 WHERE parent_item_id = ?2",
                        params![group.as_str(), m.id.as_str()],
                    )?;
                }
            }
        }
        ReorderBatch::Groups(moves) => {
            for m in moves {
                let changed = conn.execute(
                    "UPDATE board_groups SET position = ?1 WHERE id = ?2 AND board_id = ?3",
                    params![m.position, m.id.as_str(), board.as_str()],
                )?;
                if changed == 0 {
                    return Err(StoreError::not_found("group", m.id.as_str()));
                }
            }
        }
    }
    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn resolve_session(&self, token: &str) -> Result<Option<UserId>, StoreError> {
        let token = token.to_string();
        self.run(move |conn| {
            Ok(conn
                .query_row(
                    "SELECT user_id FROM sessions WHERE token = ?1",
                    params![token],
                    |row| row.get::<_, String>(0),
                )
                .optional()?
                .map(UserId::from))
        })
        .await
    }

    async fn insert_session(&self, token: &str, user: &UserId) -> Result<(), StoreError> {
        let token = token.to_string();
        let user = user.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO sessions(token, user_id) VALUES (?1, ?2)",
                params![token, user.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn is_workspace_member(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<bool, StoreError> {
        let workspace = workspace.clone();
        let user = user.clone();
        self.run(move |conn| {
            Ok(conn
                .query_row(
                    "SELECT 1 FROM workspace_members WHERE workspace_id = ?1 AND user_id = ?2",
                    params![workspace.as_str(), user.as_str()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some())
        })
        .await
    }

    async fn add_workspace_member(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<(), StoreError> {
        let workspace = workspace.clone();
        let user = user.clone();
        self.run(move |conn| {
            if !exists(conn, "SELECT 1 FROM workspaces WHERE id = ?1", workspace.as_str())? {
                return Err(StoreError::not_found("workspace", workspace.as_str()));
            }
            conn.execute(
                "INSERT OR IGNORE INTO workspace_members(workspace_id, user_id) VALUES (?1, ?2)",
                params![workspace.as_str(), user.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn create_workspace(&self, name: &str, owner: &UserId) -> Result<Workspace, StoreError> {
        let name = name.to_string();
        let owner = owner.clone();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let workspace = Workspace {
                id: WorkspaceId::generate(),
                name,
                created_at: Utc::now(),
            };
            tx.execute(
                "INSERT INTO workspaces(id, name, created_at) VALUES (?1, ?2, ?3)",
                params![workspace.id.as_str(), workspace.name, workspace.created_at],
            )?;
            tx.execute(
                "INSERT INTO workspace_members(workspace_id, user_id) VALUES (?1, ?2)",
                params![workspace.id.as_str(), owner.as_str()],
            )?;
            tx.commit()?;
            Ok(workspace)
        })
        .await
    }

    async fn get_workspace(&self, id: &WorkspaceId) -> Result<Option<Workspace>, StoreError> {
        let id = id.clone();
        self.run(move |conn| {
            Ok(conn
                .query_row(
                    "SELECT id, name, created_at FROM workspaces WHERE id = ?1",
                    params![id.as_str()],
                    |row| {
                        Ok(Workspace {
                            id: WorkspaceId::from(row.get::<_, String>(0)?),
                            name: row.get(1)?,
                            created_at: row.get(2)?,
                        })
                    },
                )
                .optional()?)
        })
        .await
    }

    async fn next_position(&self, scope: &Scope) -> Result<i64, StoreError> {
        let scope = scope.clone();
        self.run(move |conn| next_position_tx(conn, &scope)).await
    }

    async fn create_board(&self, workspace: &WorkspaceId, name: &str) -> Result<Board, StoreError> {
        let workspace = workspace.clone();
        let name = name.to_string();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            if !exists(&tx, "SELECT 1 FROM workspaces WHERE id = ?1", workspace.as_str())? {
                return Err(StoreError::not_found("workspace", workspace.as_str()));
            }
            let position = next_position_tx(&tx, &Scope::Workspace(workspace.clone()))?;
            let board = Board {
                id: BoardId::generate(),
                workspace_id: workspace,
                name,
                position,
                revision: 0,
                created_at: Utc::now(),
            };
            tx.execute(
                "INSERT INTO boards(id, workspace_id, name, position, revision, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    board.id.as_str(),
                    board.workspace_id.as_str(),
                    board.name,
                    board.position,
                    board.revision,
                    board.created_at,
                ],
            )?;
            tx.commit()?;
            debug!(board_id = %board.id, position = board.position, "Inserted board");
            Ok(board)
        })
        .await
    }

    async fn get_board(&self, id: &BoardId) -> Result<Option<Board>, StoreError> {
        let id = id.clone();
        self.run(move |conn| get_board(conn, id.as_str())).await
    }

    async fn list_boards(&self, workspace: &WorkspaceId) -> Result<Vec<Board>, StoreError> {
        let workspace = workspace.clone();
        self.run(move |conn| {
            let sql = format!("SELECT {BOARD_COLUMNS} FROM boards WHERE workspace_id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            let mut boards = stmt
                .query_map(params![workspace.as_str()], board_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            sort_by_position(&mut boards);
            Ok(boards)
        })
        .await
    }

    async fn create_group(&self, board: &BoardId, title: &str) -> Result<Group, StoreError> {
        let board = board.clone();
        let title = title.to_string();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            if !exists(&tx, "SELECT 1 FROM boards WHERE id = ?1", board.as_str())? {
                return Err(StoreError::not_found("board", board.as_str()));
            }
            let position = next_position_tx(&tx, &Scope::Board(board.clone()))?;
            let group = Group {
                id: GroupId::generate(),
                board_id: board,
                title,
                position,
                created_at: Utc::now(),
            };
            tx.execute(
                "INSERT INTO board_groups(id, board_id, title, position, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    group.id.as_str(),
                    group.board_id.as_str(),
                    group.title,
                    group.position,
                    group.created_at,
                ],
            )?;
            tx.commit()?;
            Ok(group)
        })
        .await
    }

    async fn get_group(&self, id: &GroupId) -> Result<Option<Group>, StoreError> {
        let id = id.clone();
        self.run(move |conn| get_group(conn, id.as_str())).await
    }

    async fn list_groups(&self, board: &BoardId) -> Result<Vec<Group>, StoreError> {
        let board = board.clone();
        self.run(move |conn| {
            let sql = format!("SELECT {GROUP_COLUMNS} FROM board_groups WHERE board_id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            let mut groups = stmt
                .query_map(params![board.as_str()], group_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            sort_by_position(&mut groups);
            Ok(groups)
        })
        .await
    }

    async fn create_item(&self, group: &GroupId, name: &str) -> Result<Item, StoreError> {
        let group = group.clone();
        let name = name.to_string();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let owner = get_group(&tx, group.as_str())?
                .ok_or_else(|| StoreError::not_found("group", group.as_str()))?;
            let position = next_position_tx(&tx, &Scope::Group(group.clone()))?;
            let item = Item {
                id: ItemId::generate(),
                board_id: owner.board_id,
                group_id: group,
                parent_item_id: None,
                name,
                position,
                created_at: Utc::now(),
            };
            insert_item(&tx, &item)?;
            tx.commit()?;
            Ok(item)
        })
        .await
    }

    async fn create_subitem(&self, parent: &ItemId, name: &str) -> Result<Item, StoreError> {
        let parent = parent.clone();
        let name = name.to_string();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let owner = get_item(&tx, parent.as_str())?
                .ok_or_else(|| StoreError::not_found("item", parent.as_str()))?;
            let position = next_position_tx(&tx, &Scope::Item(parent.clone()))?;
            let item = Item {
                id: ItemId::generate(),
                board_id: owner.board_id,
                group_id: owner.group_id,
                parent_item_id: Some(parent),
                name,
                position,
                created_at: Utc::now(),
            };
            insert_item(&tx, &item)?;
            tx.commit()?;
            Ok(item)
        })
        .await
    }

    async fn get_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        let id = id.clone();
        self.run(move |conn| get_item(conn, id.as_str())).await
    }

    async fn list_items(&self, board: &BoardId) -> Result<Vec<Item>, StoreError> {
        let board = board.clone();
        self.run(move |conn| {
            let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE board_id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            let mut items = stmt
                .query_map(params![board.as_str()], item_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            sort_by_position(&mut items);
            Ok(items)
        })
        .await
    }

    async fn reorder(
        &self,
        board: &BoardId,
        batch: &ReorderBatch,
        expected_revision: Option<i64>,
        audit: NewActivity,
    ) -> Result<i64, StoreError> {
        let board = board.clone();
        let batch = batch.clone();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let actual: i64 = tx
                .query_row(
                    "SELECT revision FROM boards WHERE id = ?1",
                    params![board.as_str()],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| StoreError::not_found("board", board.as_str()))?;
            if let Some(expected) = expected_revision.filter(|e| *e != actual) {
                return Err(StoreError::RevisionMismatch {
                    board: board.to_string(),
                    expected,
                    actual,
                });
            }

            // Any error below drops `tx` uncommitted, rolling back every update.
            apply_batch(&tx, &board, &batch)?;

            let revision = actual.saturating_add(1);
            tx.execute(
                "UPDATE boards SET revision = ?1 WHERE id = ?2",
                params![revision, board.as_str()],
            )?;
            tx.execute(
                "INSERT INTO activity_log(board_id, user_id, action, details, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    audit.board_id.as_str(),
                    audit.user_id.as_str(),
                    audit.action,
                    audit.details,
                    Utc::now(),
                ],
            )?;
            tx.commit()?;
            Ok(revision)
        })
        .await
    }

    async fn list_activity(
        &self,
        board: &BoardId,
        limit: usize,
    ) -> Result<Vec<Activity>, StoreError> {
        let board = board.clone();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, board_id, user_id, action, details, created_at
                 FROM activity_log WHERE board_id = ?1 ORDER BY id DESC LIMIT ?2",
            )?;
            let activity = stmt
                .query_map(params![board.as_str(), limit], activity_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(activity)
        })
        .await
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod sqlite_tests;
