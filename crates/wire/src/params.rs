// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed request params for each JSON-RPC method (§4.7). Wire field
//! names are camelCase; the daemon maps these into the domain types C2-C6
//! operate on.

use std::path::PathBuf;

use serde::Deserialize;

use nova_core::PermissionMode;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInvokeParams {
    pub plugin: String,
    pub agent: String,
    pub project_path: PathBuf,
    pub prompt: String,
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

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdParams {
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMessageParams {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSessionsParams {
    pub project_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHistoryParams {
    pub project_id: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDeleteParams {
    pub project_id: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDeleteBulkParams {
    pub project_id: String,
    pub session_ids: Vec<String>,
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
