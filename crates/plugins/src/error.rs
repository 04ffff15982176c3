// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure modes across plugin loading, registry brokering, and
//! plugin-level session operations (§7).

use nova_core::SessionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin not found: {0}")]
    PluginNotFound(String),

    #[error("agent not found: {plugin}:{agent}")]
    AgentNotFound { plugin: String, agent: String },

    #[error("agent disabled: {plugin}:{agent}")]
    AgentDisabled { plugin: String, agent: String },

    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("session already completed; create a new session with resume")]
    SessionCompleted(SessionId),

    #[error("manifest invalid: {0}")]
    ManifestInvalid(#[from] nova_core::ManifestError),

    #[error("plugin load error: {0}")]
    LoadError(String),

    #[error(transparent)]
    Pty(#[from] nova_pty::PtyError),
}
