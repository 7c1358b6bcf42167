use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::instrument;

use crate::model::{Activity, BoardId};
use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::store::{DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT};

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
}

impl ActivityQuery {
    fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .min(MAX_ACTIVITY_LIMIT)
    }
}

/// Audit log of a board, newest first.
#[instrument(
    name = "http.list_activity",
    skip_all,
    fields(board_id = %board_id)
)]
pub async fn list_activity(
    State(state): State<AppState>,
    caller: Caller,
    Path(board_id): Path<String>,
    query: Result<Query<ActivityQuery>, QueryRejection>,
) -> Result<Json<Vec<Activity>>, ApiError> {
    let board = caller
        .authorize_board(&state, &BoardId::from(board_id))
        .await?;
    let Query(query) = query?;

    let records = state
        .store
        .list_activity(&board.id, query.effective_limit())
        .await?;
    Ok(Json(records))
}
