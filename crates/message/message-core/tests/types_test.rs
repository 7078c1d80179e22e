use std::collections::HashMap;

use message_core::Message;

#[test]
fn test_message_creation() {
    let mut headers = HashMap::new();
    headers.insert("x".to_string(), "1".to_string());

    let message = Message::with_headers("m1", "hi", headers);

    assert_eq!(message.id, "m1");
    assert_eq!(message.content, "hi");
    assert_eq!(message.get_header("x"), Some("1"));
}

#[test]
fn test_message_serialization_uses_body() {
    let message = Message::new("m1", "hi").header("x", "1");

    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["id"], "m1");
    assert_eq!(value["body"], "hi");
    assert_eq!(value["headers"]["x"], "1");
    assert!(value.get("content").is_none());

    let deserialized: Message = serde_json::from_value(value).unwrap();
    assert_eq!(deserialized, message);
}

#[test]
fn test_message_deserialization_without_headers() {
    let message: Message = serde_json::from_str(r#"{"id":"m1","body":"hi"}"#).unwrap();
    assert!(message.headers.is_empty());
    assert_eq!(message.get_header("x"), None);
}

#[test]
fn test_message_deserialization_null_headers() {
    let message: Message =
        serde_json::from_str(r#"{"id":"m1","body":"hi","headers":null}"#).unwrap();
    assert!(message.headers.is_empty());
}
