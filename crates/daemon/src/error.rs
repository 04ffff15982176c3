// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure modes surfaced across the JSON-RPC boundary and their mapping
//! onto standard/extension error codes (§7).

use thiserror::Error;

use nova_history::HistoryError;
use nova_plugins::PluginError;
use nova_wire::error_codes;
use nova_wire::ErrorObject;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("invalid params: {0}")]
    InvalidParams(#[from] serde_json::Error),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("request timed out")]
    Timeout,
}

impl DaemonError {
    /// §7's error table, collapsed onto the JSON-RPC standard plus
    /// extension codes carried in `nova-wire`.
    pub fn to_error_object(&self) -> ErrorObject {
        match self {
            DaemonError::MethodNotFound(method) => {
                ErrorObject::new(error_codes::METHOD_NOT_FOUND, format!("Method not found: {method}"))
            }
            DaemonError::InvalidParams(source) => {
                ErrorObject::new(error_codes::INVALID_PARAMS, format!("Invalid params: {source}"))
            }
            DaemonError::Plugin(PluginError::PluginNotFound(_)) => {
                ErrorObject::new(error_codes::PLUGIN_NOT_FOUND, self.to_string())
            }
            DaemonError::Plugin(PluginError::AgentNotFound { .. }) => {
                ErrorObject::new(error_codes::AGENT_NOT_FOUND, self.to_string())
            }
            DaemonError::Plugin(PluginError::AgentDisabled { .. }) => {
                ErrorObject::new(error_codes::AGENT_DISABLED, self.to_string())
            }
            DaemonError::Plugin(PluginError::SessionNotFound(_))
            | DaemonError::Plugin(PluginError::SessionCompleted(_)) => {
                ErrorObject::new(error_codes::SESSION_NOT_FOUND, self.to_string())
            }
            // ProjectNotFound has no dedicated extension code in the
            // transport's error table; it shares the session-scoped one
            // since both name a missing resource identified by the client.
            DaemonError::History(HistoryError::ProjectNotFound(_))
            | DaemonError::History(HistoryError::SessionNotFound(_)) => {
                ErrorObject::new(error_codes::SESSION_NOT_FOUND, self.to_string())
            }
            DaemonError::Plugin(_) | DaemonError::History(_) | DaemonError::Timeout => {
                ErrorObject::new(error_codes::INTERNAL_ERROR, self.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
