use super::*;
use crate::ordering::OrderingError;

#[test]
fn test_structured_error_json_format() {
    let se = StructuredError::new("BOARD_NOT_FOUND", "board not found: abc".to_string());
    let parsed = serde_json::to_value(&se).unwrap();
    assert_eq!(parsed["success"], false);
    assert_eq!(parsed["messages"][0]["code"], "BOARD_NOT_FOUND");
    assert_eq!(parsed["messages"][0]["message"], "board not found: abc");
    assert!(parsed["messages"][0].get("tip").is_none());
}

#[test]
fn test_structured_error_with_tip() {
    let se = StructuredError::new("UNAUTHENTICATED", "Missing token".to_string())
        .with_tip("Send an 'Authorization: Bearer <token>' header");
    let parsed = serde_json::to_value(&se).unwrap();
    assert_eq!(
        parsed["messages"][0]["tip"],
        "Send an 'Authorization: Bearer <token>' header"
    );
}

#[test]
fn test_from_error_uses_mapping() {
    let err = OrderingError::UnknownKind("widgets".to_string());
    let se = StructuredError::from_error(&err);
    let parsed = serde_json::to_value(&se).unwrap();
    assert_eq!(parsed["messages"][0]["code"], "UNKNOWN_REORDER_TYPE");
    assert!(parsed["messages"][0]["message"]
        .as_str()
        .unwrap()
        .contains("widgets"));
    assert!(parsed["messages"][0]["tip"].is_string());
}

#[test]
fn test_from_parts_overrides_message() {
    let err = OrderingError::DuplicateEntity("a".to_string());
    let se = StructuredError::from_parts(&err, "custom".to_string());
    assert_eq!(se.messages[0].message, "custom");
    assert_eq!(se.messages[0].code, "DUPLICATE_ENTITY");
}
