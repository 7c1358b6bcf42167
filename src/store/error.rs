use thiserror::Error;

use crate::ordering::OrderingError;

/// Errors returned by [`Store`](super::Store) implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Board {board} has revision {actual}, expected {expected}")]
    RevisionMismatch {
        board: String,
        expected: i64,
        actual: i64,
    },

    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error("Store worker failed: {0}")]
    Worker(String),
}

impl StoreError {
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}
