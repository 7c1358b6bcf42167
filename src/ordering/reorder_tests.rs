use super::*;

fn item(id: &str, position: i64) -> ItemMove {
    ItemMove {
        id: ItemId::from(id),
        position,
        group_id: None,
    }
}

#[test]
fn test_kind_parses_known_discriminators() {
    assert_eq!("items".parse::<ReorderKind>().unwrap(), ReorderKind::Items);
    assert_eq!("groups".parse::<ReorderKind>().unwrap(), ReorderKind::Groups);
}

#[test]
fn test_kind_rejects_unknown_discriminator() {
    let err = "widgets".parse::<ReorderKind>().unwrap_err();
    assert_eq!(err, OrderingError::UnknownKind("widgets".to_string()));
    assert!(err.to_string().contains("widgets"));
}

#[test]
fn test_kind_is_case_sensitive() {
    assert!("Items".parse::<ReorderKind>().is_err());
}

#[test]
fn test_batch_takes_array_matching_kind() {
    let groups = vec![GroupMove {
        id: GroupId::from("g1"),
        position: 0,
    }];
    let batch = ReorderBatch::new(ReorderKind::Items, Some(vec![item("a", 1)]), Some(groups)).unwrap();
    assert_eq!(batch.kind(), ReorderKind::Items);
    assert_eq!(batch.len(), 1);
}

#[test]
fn test_missing_array_is_empty_batch() {
    let batch = ReorderBatch::new(ReorderKind::Groups, None, None).unwrap();
    assert!(batch.is_empty());
    assert_eq!(batch, ReorderBatch::Groups(Vec::new()));
}

#[test]
fn test_duplicate_ids_rejected() {
    let err = ReorderBatch::new(
        ReorderKind::Items,
        Some(vec![item("a", 0), item("b", 1), item("a", 2)]),
        None,
    )
    .unwrap_err();
    assert_eq!(err, OrderingError::DuplicateEntity("a".to_string()));
}

#[test]
fn test_negative_position_is_accepted() {
    let batch = ReorderBatch::new(ReorderKind::Items, Some(vec![item("a", -1)]), None).unwrap();
    assert_eq!(batch, ReorderBatch::Items(vec![item("a", -1)]));
}

#[test]
fn test_duplicate_positions_are_allowed() {
    let batch = ReorderBatch::new(ReorderKind::Items, Some(vec![item("a", 3), item("b", 3)]), None);
    assert!(batch.is_ok());
}

#[test]
fn test_item_move_accepts_camel_case_group_id() {
    let parsed: ItemMove =
        serde_json::from_str(r#"{"id":"a","position":2,"groupId":"g2"}"#).unwrap();
    assert_eq!(parsed.group_id, Some(GroupId::from("g2")));
    let without: ItemMove = serde_json::from_str(r#"{"id":"a","position":2}"#).unwrap();
    assert_eq!(without.group_id, None);
}

#[test]
fn test_summary_describes_whole_batch() {
    let batch = ReorderBatch::Items(vec![
        ItemMove {
            id: ItemId::from("a"),
            position: 2,
            group_id: Some(GroupId::from("g2")),
        },
        item("b", 0),
    ]);
    let summary = batch.summary();
    assert_eq!(summary["type"], "items");
    assert_eq!(summary["count"], 2);
    assert_eq!(summary["entries"][0]["groupId"], "g2");
    assert_eq!(summary["entries"][1]["position"], 0);
    assert!(summary["entries"][1].get("groupId").is_none());
}
