use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, instrument};

use super::required_name;
use crate::model::{Board, WorkspaceId};
use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
}

/// Append a board to the end of a workspace.
#[instrument(
    name = "http.create_board",
    skip_all,
    fields(workspace_id = %workspace_id)
)]
pub async fn create_board(
    State(state): State<AppState>,
    caller: Caller,
    Path(workspace_id): Path<String>,
    payload: Result<Json<CreateBoardRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    let workspace_id = WorkspaceId::from(workspace_id);

    state
        .store
        .get_workspace(&workspace_id)
        .await?
        .ok_or_else(|| ApiError::not_found("workspace", workspace_id.as_str()))?;
    caller.require_member(&state, &workspace_id).await?;

    let Json(req) = payload?;
    let name = required_name("name", &req.name)?;

    let board = state.store.create_board(&workspace_id, &name).await?;
    info!(board_id = %board.id, position = board.position, "Board created");
    Ok((StatusCode::CREATED, Json(board)))
}
