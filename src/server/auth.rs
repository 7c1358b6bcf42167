//! Bearer-token authentication and workspace membership checks.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tracing::debug;

use super::error::ApiError;
use super::AppState;
use crate::model::{Board, BoardId, UserId, WorkspaceId};

/// The authenticated user behind a request.
///
/// Extracting a `Caller` fails with 401 before the handler body runs, so a
/// handler taking one never touches the store for anonymous requests.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: UserId,
}

/// Token from an `Authorization: Bearer <token>` header.
#[must_use]
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;
        let user_id = state
            .store
            .resolve_session(token)
            .await?
            .ok_or(ApiError::Unauthenticated)?;
        debug!(user_id = %user_id, "Authenticated request");
        Ok(Caller { user_id })
    }
}

impl Caller {
    /// Fail with 403 unless the caller belongs to `workspace`.
    pub async fn require_member(
        &self,
        state: &AppState,
        workspace: &WorkspaceId,
    ) -> Result<(), ApiError> {
        if state
            .store
            .is_workspace_member(workspace, &self.user_id)
            .await?
        {
            Ok(())
        } else {
            Err(ApiError::Forbidden(workspace.to_string()))
        }
    }

    /// Load `board` and check the caller may act on it.
    ///
    /// Unknown boards are 404; boards of a foreign workspace are 403.
    pub async fn authorize_board(
        &self,
        state: &AppState,
        board_id: &BoardId,
    ) -> Result<Board, ApiError> {
        let board = state
            .store
            .get_board(board_id)
            .await?
            .ok_or_else(|| ApiError::not_found("board", board_id.as_str()))?;
        self.require_member(state, &board.workspace_id).await?;
        Ok(board)
    }
}
