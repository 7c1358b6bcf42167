pub mod activity_list;
pub mod board_create;
pub mod board_list;
pub mod board_read;
pub mod board_reorder;
pub mod group_create;
pub mod item_create;
pub mod subitem_create;
pub mod workspace_create;

use super::error::ApiError;

/// Trim `value` and reject it when nothing is left.
pub(crate) fn required_name(field: &'static str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::EmptyName(field));
    }
    Ok(trimmed.to_string())
}
