// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use super::*;

#[test]
fn request_without_id_is_a_notification() {
    let raw = r#"{"jsonrpc":"2.0","method":"session.event","params":{}}"#;
    let request: Request = serde_json::from_str(raw).expect("parse");
    assert!(request.is_notification());
}

#[test]
fn request_with_id_is_not_a_notification() {
    let raw = r#"{"jsonrpc":"2.0","id":1,"method":"agent.invoke","params":{}}"#;
    let request: Request = serde_json::from_str(raw).expect("parse");
    assert!(!request.is_notification());
}

#[test]
fn success_response_serializes_result_not_error() {
    let response = Response::success(RequestId::Number(1), json!({"ok": true}));
    let value = serde_json::to_value(&response).expect("serialize");
    assert_eq!(value["result"]["ok"], true);
    assert!(value.get("error").is_none());
}

#[test]
fn failure_response_serializes_error_not_result() {
    let response = Response::failure(RequestId::Number(1), ErrorObject::new(-32601, "Method not found: nonsense"));
    let value = serde_json::to_value(&response).expect("serialize");
    assert_eq!(value["error"]["code"], -32601);
    assert!(value.get("result").is_none());
}

#[test]
fn error_object_omits_absent_data() {
    let error = ErrorObject::new(-32602, "Invalid params");
    let value = serde_json::to_value(&error).expect("serialize");
    assert!(value.get("data").is_none());
}

#[test]
fn notification_uses_session_event_method() {
    let notification = Notification::session_event(json!({"type": "init"}));
    assert_eq!(notification.method, "session.event");
    let value = serde_json::to_value(&notification).expect("serialize");
    assert!(value.get("id").is_none());
}
