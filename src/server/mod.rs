//! HTTP surface of the daemon.
//!
//! Routes are thin: each handler authenticates the caller, resolves the
//! addressed workspace or board, and delegates to the injected [`Store`].

mod auth;
mod error;
mod error_mapping;
mod handlers;
mod structured_error;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::store::Store;

pub use auth::Caller;
pub use error::ApiError;
pub use handlers::board_read::{BoardView, GroupView, ItemView};
pub use handlers::board_reorder::{ReorderRequest, ReorderResponse};
pub use structured_error::{ErrorMessage, StructuredError, ToStructuredError};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

/// Build the application router. Cross-cutting layers (CORS, request
/// logging) are added by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/workspaces",
            post(handlers::workspace_create::create_workspace),
        )
        .route(
            "/workspaces/:workspace_id/boards",
            get(handlers::board_list::list_boards).post(handlers::board_create::create_board),
        )
        .route("/boards/:board_id", get(handlers::board_read::get_board))
        .route(
            "/boards/:board_id/groups",
            post(handlers::group_create::create_group),
        )
        .route(
            "/boards/:board_id/items",
            post(handlers::item_create::create_item),
        )
        .route(
            "/boards/:board_id/reorder",
            patch(handlers::board_reorder::reorder_board),
        )
        .route(
            "/boards/:board_id/activity",
            get(handlers::activity_list::list_activity),
        )
        .route(
            "/items/:item_id/subitems",
            post(handlers::subitem_create::create_subitem),
        )
        .with_state(state)
}
