use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::instrument;

use crate::model::{Board, BoardId, Group, GroupId, Item, ItemId};
use crate::server::auth::Caller;
use crate::server::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub subitems: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct GroupView {
    #[serde(flatten)]
    pub group: Group,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: Board,
    pub groups: Vec<GroupView>,
}

/// Nest `items` under `groups`. Both inputs are already in display order and
/// grouping preserves it.
#[must_use]
pub(crate) fn assemble_board(board: Board, groups: Vec<Group>, items: Vec<Item>) -> BoardView {
    let mut subitems: HashMap<ItemId, Vec<Item>> = HashMap::new();
    let mut top_level: HashMap<GroupId, Vec<Item>> = HashMap::new();
    for item in items {
        match item.parent_item_id.clone() {
            Some(parent) => subitems.entry(parent).or_default().push(item),
            None => top_level.entry(item.group_id.clone()).or_default().push(item),
        }
    }

    let groups = groups
        .into_iter()
        .map(|group| {
            let items = top_level
                .remove(&group.id)
                .unwrap_or_default()
                .into_iter()
                .map(|item| ItemView {
                    subitems: subitems.remove(&item.id).unwrap_or_default(),
                    item,
                })
                .collect();
            GroupView { group, items }
        })
        .collect();

    BoardView { board, groups }
}

#[instrument(
    name = "http.get_board",
    skip_all,
    fields(board_id = %board_id)
)]
pub async fn get_board(
    State(state): State<AppState>,
    caller: Caller,
    Path(board_id): Path<String>,
) -> Result<Json<BoardView>, ApiError> {
    let board = caller
        .authorize_board(&state, &BoardId::from(board_id))
        .await?;

    let groups = state.store.list_groups(&board.id).await?;
    let items = state.store.list_items(&board.id).await?;
    Ok(Json(assemble_board(board, groups, items)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkspaceId;
    use chrono::Utc;

    fn item(id: &str, group: &str, parent: Option<&str>, position: i64) -> Item {
        Item {
            id: ItemId::from(id),
            board_id: BoardId::from("b1"),
            group_id: GroupId::from(group),
            parent_item_id: parent.map(ItemId::from),
            name: id.to_string(),
            position,
            created_at: Utc::now(),
        }
    }

    fn group(id: &str, position: i64) -> Group {
        Group {
            id: GroupId::from(id),
            board_id: BoardId::from("b1"),
            title: id.to_string(),
            position,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_board_nests_in_order() {
        let board = Board {
            id: BoardId::from("b1"),
            workspace_id: WorkspaceId::from("w1"),
            name: "Board".to_string(),
            position: 0,
            revision: 0,
            created_at: Utc::now(),
        };
        let groups = vec![group("g2", 0), group("g1", 1)];
        let items = vec![
            item("a", "g1", None, 0),
            item("a-sub", "g1", Some("a"), 0),
            item("b", "g1", None, 1),
            item("c", "g2", None, 0),
        ];

        let view = assemble_board(board, groups, items);
        let titles: Vec<&str> = view.groups.iter().map(|g| g.group.title.as_str()).collect();
        assert_eq!(titles, vec!["g2", "g1"]);

        let g1_items: Vec<&str> = view.groups[1].items.iter().map(|i| i.item.name.as_str()).collect();
        assert_eq!(g1_items, vec!["a", "b"]);
        assert_eq!(view.groups[1].items[0].subitems.len(), 1);
        assert_eq!(view.groups[0].items[0].item.name, "c");
    }

    #[test]
    fn test_board_view_serializes_flat() {
        let board = Board {
            id: BoardId::from("b1"),
            workspace_id: WorkspaceId::from("w1"),
            name: "Board".to_string(),
            position: 3,
            revision: 2,
            created_at: Utc::now(),
        };
        let view = assemble_board(board, vec![group("g1", 0)], vec![]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "b1");
        assert_eq!(json["workspaceId"], "w1");
        assert_eq!(json["revision"], 2);
        assert_eq!(json["groups"][0]["id"], "g1");
        assert!(json["groups"][0]["items"].as_array().unwrap().is_empty());
    }
}
