use axum::extract::{Path, State};
use axum::Json;
use tracing::instrument;

use crate::model::{Board, WorkspaceId};
use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::AppState;

#[instrument(
    name = "http.list_boards",
    skip_all,
    fields(workspace_id = %workspace_id)
)]
pub async fn list_boards(
    State(state): State<AppState>,
    caller: Caller,
    Path(workspace_id): Path<String>,
) -> Result<Json<Vec<Board>>, ApiError> {
    let workspace_id = WorkspaceId::from(workspace_id);

    state
        .store
        .get_workspace(&workspace_id)
        .await?
        .ok_or_else(|| ApiError::not_found("workspace", workspace_id.as_str()))?;
    caller.require_member(&state, &workspace_id).await?;

    Ok(Json(state.store.list_boards(&workspace_id).await?))
}
