use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::model::{BoardId, NewActivity};
use crate::ordering::{GroupMove, ItemMove, ReorderBatch, ReorderKind, REORDER_ACTION};
use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::AppState;

/// Body of `PATCH /boards/:board_id/reorder`.
///
/// `type` stays a plain string here so an unknown value is reported as a
/// reorder error rather than a generic deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub items: Option<Vec<ItemMove>>,
    #[serde(default)]
    pub groups: Option<Vec<GroupMove>>,
    #[serde(default)]
    pub expected_revision: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderResponse {
    pub success: bool,
    pub revision: i64,
}

/// Apply a client-computed order to the items or groups of a board.
///
/// The whole batch commits or none of it does, together with one
/// `board.reordered` audit record.
#[instrument(
    name = "http.reorder_board",
    skip_all,
    fields(board_id = %board_id)
)]
pub async fn reorder_board(
    State(state): State<AppState>,
    caller: Caller,
    Path(board_id): Path<String>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Json<ReorderResponse>, ApiError> {
    let board = caller
        .authorize_board(&state, &BoardId::from(board_id))
        .await?;

    let Json(req) = payload?;
    let kind: ReorderKind = req.kind.parse()?;
    let batch = ReorderBatch::new(kind, req.items, req.groups)?;

    let audit = NewActivity {
        board_id: board.id.clone(),
        user_id: caller.user_id.clone(),
        action: REORDER_ACTION.to_string(),
        details: batch.summary(),
    };
    let revision = state
        .store
        .reorder(&board.id, &batch, req.expected_revision, audit)
        .await?;

    info!(
        kind = %kind,
        count = batch.len(),
        user_id = %caller.user_id,
        revision,
        "Board reordered"
    );
    Ok(Json(ReorderResponse {
        success: true,
        revision,
    }))
}
