// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classification of one parsed line of upstream JSON output (§4.4).

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// `{type: "system", subtype: "init", session_id: ...}` — captured once.
    Init { upstream_session_id: String },
    /// `{type: "assistant", ...}` — marks the session as processing.
    Assistant,
    /// `{type: "result", ...}` — marks the session idle; may still carry
    /// the upstream id if `Init` was never observed.
    Result { upstream_session_id: Option<String> },
    /// `user`, `system` (non-init), or any other recognized/opaque type.
    Other,
}

pub fn classify(value: &Value) -> RecordKind {
    let record_type = value.get("type").and_then(Value::as_str).unwrap_or("");
    let subtype = value.get("subtype").and_then(Value::as_str);
    let session_id = || {
        value
            .get("session_id")
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    match (record_type, subtype) {
        ("system", Some("init")) => RecordKind::Init {
            upstream_session_id: session_id().unwrap_or_default(),
        },
        ("assistant", _) => RecordKind::Assistant,
        ("result", _) => RecordKind::Result {
            upstream_session_id: session_id(),
        },
        _ => RecordKind::Other,
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
