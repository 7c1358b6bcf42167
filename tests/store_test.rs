#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::sync::Arc;

use common::create_test_dir;
use serde_json::json;
use workboard_daemon::model::NewActivity;
use workboard_daemon::ordering::{ItemMove, ReorderBatch, ReorderKind, REORDER_ACTION};
use workboard_daemon::{
    BoardId, ItemId, MemoryStore, Scope, SqliteStore, Store, StoreError, UserId,
};

fn audit(board: &BoardId, user: &UserId, batch: &ReorderBatch) -> NewActivity {
    NewActivity {
        board_id: board.clone(),
        user_id: user.clone(),
        action: REORDER_ACTION.to_string(),
        details: batch.summary(),
    }
}

fn item_batch(moves: &[(&ItemId, i64)]) -> ReorderBatch {
    let items = moves
        .iter()
        .map(|(id, position)| ItemMove {
            id: (*id).clone(),
            position: *position,
            group_id: None,
        })
        .collect();
    ReorderBatch::new(ReorderKind::Items, Some(items), None).unwrap()
}

/// Behavior both store implementations must share.
async fn check_store(store: Arc<dyn Store>) {
    let user = UserId::from("u1");
    store.insert_session("tok", &user).await.unwrap();
    assert_eq!(store.resolve_session("tok").await.unwrap(), Some(user.clone()));
    assert_eq!(store.resolve_session("other").await.unwrap(), None);

    let workspace = store.create_workspace("Acme", &user).await.unwrap();
    assert!(store.is_workspace_member(&workspace.id, &user).await.unwrap());
    let guest = UserId::from("u2");
    assert!(!store.is_workspace_member(&workspace.id, &guest).await.unwrap());
    store.add_workspace_member(&workspace.id, &guest).await.unwrap();
    assert!(store.is_workspace_member(&workspace.id, &guest).await.unwrap());

    let board = store.create_board(&workspace.id, "Roadmap").await.unwrap();
    assert_eq!(board.position, 0);
    assert_eq!(
        store
            .next_position(&Scope::Workspace(workspace.id.clone()))
            .await
            .unwrap(),
        1
    );

    let group = store.create_group(&board.id, "Todo").await.unwrap();
    assert_eq!(
        store.next_position(&Scope::Group(group.id.clone())).await.unwrap(),
        0
    );
    let a = store.create_item(&group.id, "A").await.unwrap();
    let b = store.create_item(&group.id, "B").await.unwrap();
    let c = store.create_item(&group.id, "C").await.unwrap();
    assert_eq!((a.position, b.position, c.position), (0, 1, 2));

    let batch = item_batch(&[(&a.id, 2), (&b.id, 0), (&c.id, 1)]);
    let revision = store
        .reorder(&board.id, &batch, None, audit(&board.id, &user, &batch))
        .await
        .unwrap();
    assert_eq!(revision, 1);
    let names: Vec<String> = store
        .list_items(&board.id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["B", "C", "A"]);

    // One missing id fails everything.
    let ghost = ItemId::from("ghost");
    let batch = item_batch(&[(&a.id, 0), (&ghost, 5)]);
    let err = store
        .reorder(&board.id, &batch, None, audit(&board.id, &user, &batch))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: "item", .. }));
    let a_after = store.get_item(&a.id).await.unwrap().unwrap();
    assert_eq!(a_after.position, 2);

    // Stale expectation.
    let batch = item_batch(&[(&a.id, 0)]);
    let err = store
        .reorder(&board.id, &batch, Some(0), audit(&board.id, &user, &batch))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::RevisionMismatch {
            expected: 0,
            actual: 1,
            ..
        }
    ));
    assert_eq!(store.get_board(&board.id).await.unwrap().unwrap().revision, 1);

    let activity = store.list_activity(&board.id, 10).await.unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].action, REORDER_ACTION);
    assert_eq!(activity[0].details["count"], json!(3));
    assert_eq!(activity[0].user_id, user);
}

#[tokio::test]
async fn test_memory_store_behavior() {
    check_store(Arc::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn test_sqlite_store_behavior() {
    let dir = create_test_dir();
    let store = SqliteStore::open(dir.path().join("boards.db")).unwrap();
    check_store(Arc::new(store)).await;
}

#[tokio::test]
async fn test_sqlite_in_memory_store_behavior() {
    check_store(Arc::new(SqliteStore::open_in_memory().unwrap())).await;
}
