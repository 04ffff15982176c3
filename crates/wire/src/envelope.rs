// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC 2.0 request/response/notification envelopes (§4.7, §6).
//! Transport-agnostic: this crate knows nothing about WebSockets or axum,
//! only the wire shapes exchanged over them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-RPC id: string, number, or absent. `Null` is accepted on
/// deserialization but never produced by this server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// A request with no `id` is a notification: no response is ever sent
/// for it (§8 P9).
impl Request {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Success { result: Value },
    Failure { error: ErrorObject },
}

impl Response {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            outcome: Outcome::Success { result },
        }
    }

    pub fn failure(id: RequestId, error: ErrorObject) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            outcome: Outcome::Failure { error },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// A `session.event` notification: has no `id` and is never answered
/// (§4.7).
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Value,
}

impl Notification {
    pub fn session_event(event: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "session.event",
            params: event,
        }
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
