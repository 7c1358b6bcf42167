use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, instrument};

use super::required_name;
use crate::model::{BoardId, GroupId, Item};
use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub group_id: GroupId,
}

/// Append a top-level item to a group of the board.
#[instrument(
    name = "http.create_item",
    skip_all,
    fields(board_id = %board_id)
)]
pub async fn create_item(
    State(state): State<AppState>,
    caller: Caller,
    Path(board_id): Path<String>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let board = caller
        .authorize_board(&state, &BoardId::from(board_id))
        .await?;

    let Json(req) = payload?;
    let name = required_name("name", &req.name)?;

    // A group of another board is reported the same as a missing one.
    let group = state
        .store
        .get_group(&req.group_id)
        .await?
        .filter(|g| g.board_id == board.id)
        .ok_or_else(|| ApiError::not_found("group", req.group_id.as_str()))?;

    let item = state.store.create_item(&group.id, &name).await?;
    info!(
        item_id = %item.id,
        group_id = %group.id,
        position = item.position,
        "Item created"
    );
    Ok((StatusCode::CREATED, Json(item)))
}
