use super::error::ApiError;
use super::structured_error::ToStructuredError;
use crate::ordering::OrderingError;
use crate::store::StoreError;

// ── OrderingError ──────────────────────────────────────────────────────────────
impl ToStructuredError for OrderingError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            OrderingError::UnknownKind(_) => (
                "UNKNOWN_REORDER_TYPE",
                Some("Use \"items\" or \"groups\" as the reorder type"),
            ),
            OrderingError::DuplicateEntity(_) => ("DUPLICATE_ENTITY", None),
            OrderingError::PositionOverflow(_) => ("POSITION_OVERFLOW", None),
        }
    }
}

// ── StoreError ─────────────────────────────────────────────────────────────────
impl ToStructuredError for StoreError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            StoreError::RevisionMismatch { .. } => (
                "REVISION_MISMATCH",
                Some("Reload the board and retry the reorder"),
            ),
            StoreError::Ordering(e) => e.error_code_and_tip(),
            StoreError::Sql(_)
            | StoreError::Io(_)
            | StoreError::Json(_)
            | StoreError::NotFound { .. }
            | StoreError::Worker(_) => ("INTERNAL_ERROR", None),
        }
    }
}

// ── ApiError ───────────────────────────────────────────────────────────────────
impl ToStructuredError for ApiError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            ApiError::Unauthenticated => (
                "UNAUTHENTICATED",
                Some("Send an 'Authorization: Bearer <token>' header"),
            ),
            ApiError::Forbidden(_) => ("FORBIDDEN", None),
            ApiError::NotFound { kind, .. } => match *kind {
                "workspace" => ("WORKSPACE_NOT_FOUND", None),
                "board" => ("BOARD_NOT_FOUND", None),
                "group" => ("GROUP_NOT_FOUND", None),
                "item" => ("ITEM_NOT_FOUND", None),
                _ => ("NOT_FOUND", None),
            },
            ApiError::InvalidPayload(_) => ("INVALID_PAYLOAD", None),
            ApiError::EmptyName(_) => ("NAME_REQUIRED", Some("Provide a non-empty name")),
            ApiError::NestedSubitem(_) => (
                "NESTED_SUBITEM",
                Some("Subitems can only be added to top-level items"),
            ),
            ApiError::Ordering(e) => e.error_code_and_tip(),
            ApiError::Store(e) => e.error_code_and_tip(),
        }
    }
}
