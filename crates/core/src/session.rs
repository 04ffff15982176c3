// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One live conversation/command-execution with an agent (§3, §4.4).
//!
//! `SessionState` is the fine-grained source of truth tracked by a PTY
//! session's state machine; `SessionStatus` is the coarsening exposed to
//! clients. `stopped` internal state maps to either `completed` or
//! `stopped` status depending on whether the process exited cleanly —
//! the spec documents `stopped`/`completed` as distinct client-facing
//! statuses without a distinguishing internal state, so this is the
//! implementation's resolution (see DESIGN.md).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ids::{AgentId, PluginName, SessionId};

/// Coarse, client-facing session status (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Starting,
    Running,
    WaitingForInput,
    Completed,
    Error,
    Stopped,
}

/// Fine-grained internal state machine (§4.4). Legal transitions:
/// `initializing -> ready -> processing -> idle -> stopped`, with `error`
/// reachable from any state, and an explicit `stop()` forcing `stopped`
/// from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Initializing,
    Ready,
    Processing,
    Idle,
    Error,
    Stopped,
}

impl SessionState {
    /// Coarsen this internal state into the status reported to clients.
    pub fn to_status(self, exit_code: Option<i32>) -> SessionStatus {
        match self {
            SessionState::Initializing => SessionStatus::Starting,
            SessionState::Ready | SessionState::Processing => SessionStatus::Running,
            SessionState::Idle => SessionStatus::WaitingForInput,
            SessionState::Error => SessionStatus::Error,
            SessionState::Stopped => {
                if exit_code == Some(0) {
                    SessionStatus::Completed
                } else {
                    SessionStatus::Stopped
                }
            }
        }
    }
}

/// Why a session's subprocess was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    /// `session.stop` was called explicitly.
    Explicit,
    /// The process exited on its own (with any exit code).
    ProcessExited,
    /// `agent.invoke` never observed `init` within the startup deadline.
    UpstreamInitTimeout,
    /// An unrecoverable error occurred (missing binary, spawn failure, …).
    Error,
}

/// Permission mode passed to the wrapped CLI (§4.4). Defaults to
/// `bypassPermissions`; the legacy boolean `bypass_mode=false` maps to
/// `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionMode {
    Default,
    AcceptEdits,
    BypassPermissions,
    DontAsk,
    Plan,
}

impl Default for PermissionMode {
    fn default() -> Self {
        Self::BypassPermissions
    }
}

impl PermissionMode {
    /// Map the legacy `bypass_mode` boolean onto the closed enum.
    pub fn from_legacy_bypass_mode(bypass_mode: bool) -> Self {
        if bypass_mode {
            Self::BypassPermissions
        } else {
            Self::Default
        }
    }
}

/// Parameters for `agent.invoke` (§4.4, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeOptions {
    pub prompt: String,
    pub project_path: PathBuf,
    #[serde(default)]
    pub resume_session_id: Option<String>,
    #[serde(default)]
    pub fork_session: bool,
    #[serde(default)]
    pub permission_mode: PermissionMode,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    #[serde(default)]
    pub disallowed_tools: Vec<String>,
}

/// One live conversation/command-execution with an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub agent_id: AgentId,
    pub plugin_id: PluginName,
    pub project_path: PathBuf,
    pub resume_session_id: Option<String>,
    pub upstream_session_id: Option<String>,
    pub state: SessionState,
    pub created_at: u64,
    pub last_activity: u64,
    pub exit_code: Option<i32>,
    pub message_count: u64,
    /// Partial-line residue from the PTY reader; never serialized to
    /// clients (§4.4 output-buffer bound).
    #[serde(skip)]
    pub line_buffer: String,
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        self.state.to_status(self.exit_code)
    }

    /// `upstream_session_id`, once captured, is never overwritten (§3).
    pub fn capture_upstream_id(&mut self, id: impl Into<String>) {
        if self.upstream_session_id.is_none() {
            self.upstream_session_id = Some(id.into());
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SessionState::Stopped | SessionState::Error)
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct SessionBuilder => Session {
        into {
            id: SessionId = SessionId::new("s-test"),
            agent_id: AgentId = AgentId::new("sonnet"),
            plugin_id: PluginName = PluginName::new("claude_cli"),
        }
        set {
            project_path: std::path::PathBuf = std::path::PathBuf::from("/tmp/project"),
            state: SessionState = SessionState::Initializing,
            created_at: u64 = 0,
            last_activity: u64 = 0,
            exit_code: Option<i32> = None,
            message_count: u64 = 0,
        }
        option {
            resume_session_id: String = None,
            upstream_session_id: String = None,
        }
        computed { line_buffer: String = String::new() }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
