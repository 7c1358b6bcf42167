use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, instrument};

use super::required_name;
use crate::model::Workspace;
use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
}

#[instrument(name = "http.create_workspace", skip_all)]
pub async fn create_workspace(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<CreateWorkspaceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Workspace>), ApiError> {
    let Json(req) = payload?;
    let name = required_name("name", &req.name)?;

    let workspace = state.store.create_workspace(&name, &caller.user_id).await?;
    info!(workspace_id = %workspace.id, user_id = %caller.user_id, "Workspace created");
    Ok((StatusCode::CREATED, Json(workspace)))
}
