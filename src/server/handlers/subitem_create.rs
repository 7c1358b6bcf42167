use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, instrument};

use super::required_name;
use crate::model::{Item, ItemId};
use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSubitemRequest {
    pub name: String,
}

/// Append a subitem under a top-level item.
#[instrument(
    name = "http.create_subitem",
    skip_all,
    fields(item_id = %item_id)
)]
pub async fn create_subitem(
    State(state): State<AppState>,
    caller: Caller,
    Path(item_id): Path<String>,
    payload: Result<Json<CreateSubitemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item_id = ItemId::from(item_id);

    let parent = state
        .store
        .get_item(&item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("item", item_id.as_str()))?;
    caller.authorize_board(&state, &parent.board_id).await?;

    if parent.parent_item_id.is_some() {
        return Err(ApiError::NestedSubitem(parent.id.to_string()));
    }

    let Json(req) = payload?;
    let name = required_name("name", &req.name)?;

    let subitem = state.store.create_subitem(&parent.id, &name).await?;
    info!(
        subitem_id = %subitem.id,
        parent_id = %parent.id,
        position = subitem.position,
        "Subitem created"
    );
    Ok((StatusCode::CREATED, Json(subitem)))
}
