// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session events: the typed messages a PTY session emits as it runs, and
//! the interactive-prompt descriptor used when a subprocess needs a
//! confirmation from the client. Events are produced only after a session
//! is registered; `complete` is terminal (§3, §8 P2).

use serde::{Deserialize, Serialize};

use crate::ids::SessionId;
use crate::session::SessionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionEventType {
    Output,
    Error,
    Complete,
    Status,
    Init,
    InteractivePrompt,
}

/// The payload carried by a [`SessionEvent`]. Which variant is valid for a
/// given `type` is fixed by [`SessionEventType`]; see the dispatch in
/// `nova-pty` for the mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionEventData {
    /// A structured upstream record, forwarded as parsed JSON.
    Message { message: serde_json::Value },
    /// A line that failed to parse as JSON, or a truncation marker.
    Raw { raw: String },
    /// A human-readable error description.
    Error { error: String },
    /// Terminal payload: process exit code and the captured upstream id.
    Complete {
        exit_code: Option<i32>,
        upstream_session_id: Option<String>,
    },
    /// A coarse status transition (§3).
    Status { status: SessionStatus },
    /// A confirmation request surfaced to the client.
    Prompt(InteractivePrompt),
}

/// `{session_id, type, data, timestamp}` as described in §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub session_id: SessionId,
    #[serde(rename = "type")]
    pub event_type: SessionEventType,
    pub data: SessionEventData,
    pub timestamp: u64,
}

impl SessionEvent {
    pub fn new(
        session_id: SessionId,
        event_type: SessionEventType,
        data: SessionEventData,
        timestamp: u64,
    ) -> Self {
        Self {
            session_id,
            event_type,
            data,
            timestamp,
        }
    }
}

/// A confirmation the subprocess is waiting on; exactly one response is
/// expected from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractivePrompt {
    pub kind: PromptKind,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub options: Vec<PromptOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptKind {
    BypassConfirm,
    ToolApproval,
    FileEdit,
    Selection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOption {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub is_default: bool,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
