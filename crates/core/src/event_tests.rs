// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn complete_event_round_trips_through_json() {
    let event = SessionEvent::new(
        SessionId::new("s-1"),
        SessionEventType::Complete,
        SessionEventData::Complete {
            exit_code: Some(0),
            upstream_session_id: Some("U-1".into()),
        },
        1_000,
    );
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "complete");
    let back: SessionEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back.session_id, event.session_id);
    assert!(matches!(
        back.data,
        SessionEventData::Complete {
            exit_code: Some(0),
            ..
        }
    ));
}

#[test]
fn raw_event_carries_unparsed_line() {
    let data = SessionEventData::Raw {
        raw: "not json".into(),
    };
    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json["raw"], "not json");
}

#[test]
fn prompt_option_defaults_is_default_to_false() {
    let json = serde_json::json!({"key": "yes", "label": "Yes"});
    let option: PromptOption = serde_json::from_value(json).unwrap();
    assert!(!option.is_default);
}
