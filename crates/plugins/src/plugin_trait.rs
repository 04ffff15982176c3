// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The plugin interface/capability set (§9): polymorphism without
//! inheritance, since a single statically-linked binary has no notion of
//! dynamically-loaded plugin objects. Registry code depends only on this
//! trait, never on a concrete variant.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;

use nova_core::{Agent, AgentId, InvokeOptions, PluginManifest, Session, SessionEvent, SessionId};

use crate::error::PluginError;

#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;
    fn manifest(&self) -> &PluginManifest;

    async fn initialize(&self) -> Result<(), PluginError>;
    async fn shutdown(&self);

    /// All declared agents, including disabled ones; callers filter.
    fn agents(&self) -> Vec<Agent>;
    fn get_agent(&self, agent_id: &AgentId) -> Option<Agent>;

    async fn invoke(&self, agent_id: &AgentId, opts: InvokeOptions) -> Result<Session, PluginError>;
    async fn message(&self, session_id: &SessionId, text: &str) -> Result<(), PluginError>;
    /// The already-emitted backlog plus a live receiver, so a subscriber
    /// that only arrives after `init` fired still observes it first.
    fn stream(&self, session_id: &SessionId) -> Option<(Vec<SessionEvent>, broadcast::Receiver<SessionEvent>)>;
    async fn stop(&self, session_id: &SessionId) -> Result<(), PluginError>;
    fn get_session(&self, session_id: &SessionId) -> Option<Session>;
    fn get_sessions(&self) -> Vec<Session>;
}

/// `plugin.list` entry shape (§4.7).
#[derive(Debug, Clone, Serialize)]
pub struct PluginSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub plugin_type: nova_core::PluginType,
    pub source: nova_core::PluginSource,
    pub supports: Vec<nova_core::Capability>,
    pub agents: Vec<PluginSummaryAgent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PluginSummaryAgent {
    pub id: AgentId,
    pub name: String,
    pub capabilities: Vec<nova_core::Capability>,
}

/// `agent.list` entry shape (§4.7).
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub plugin: String,
    pub id: AgentId,
    pub name: String,
    pub capabilities: Vec<nova_core::Capability>,
}
