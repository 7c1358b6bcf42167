use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, instrument};

use super::required_name;
use crate::model::{BoardId, Group};
use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub title: String,
}

#[instrument(
    name = "http.create_group",
    skip_all,
    fields(board_id = %board_id)
)]
pub async fn create_group(
    State(state): State<AppState>,
    caller: Caller,
    Path(board_id): Path<String>,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let board = caller
        .authorize_board(&state, &BoardId::from(board_id))
        .await?;

    let Json(req) = payload?;
    let title = required_name("title", &req.title)?;

    let group = state.store.create_group(&board.id, &title).await?;
    info!(group_id = %group.id, position = group.position, "Group created");
    Ok((StatusCode::CREATED, Json(group)))
}
