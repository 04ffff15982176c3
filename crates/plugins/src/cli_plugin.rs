// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete plugin wrapping the PTY-managed CLI (§4.5). Advertises the
//! agents declared in its manifest, creates and destroys
//! [`nova_pty::PtySession`]s, and translates invoke options into CLI
//! arguments (delegated to `nova_pty::launch`).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::info;

use nova_config::ConfigLoader;
use nova_core::{Agent, AgentId, InvokeOptions, PluginManifest, Session, SessionEvent, SessionId};
use nova_pty::PtySession;

use crate::error::PluginError;
use crate::plugin_trait::Plugin;

pub struct CliPlugin {
    manifest: PluginManifest,
    config: Arc<ConfigLoader>,
    sessions: Mutex<HashMap<SessionId, Arc<PtySession>>>,
}

impl CliPlugin {
    pub fn new(manifest: PluginManifest, config: Arc<ConfigLoader>) -> Self {
        Self {
            manifest,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn session_or_not_found(&self, session_id: &SessionId) -> Result<Arc<PtySession>, PluginError> {
        self.sessions
            .lock()
            .get(session_id)
            .cloned()
            .ok_or_else(|| PluginError::SessionNotFound(session_id.clone()))
    }
}

#[async_trait]
impl Plugin for CliPlugin {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    async fn initialize(&self) -> Result<(), PluginError> {
        nova_pty::launch::resolve_binary()
            .map(|_| ())
            .map_err(PluginError::Pty)
    }

    async fn shutdown(&self) {
        let sessions: Vec<_> = self.sessions.lock().drain().map(|(_, s)| s).collect();
        let stops = sessions.iter().map(|s| s.stop());
        futures_util::future::join_all(stops).await;
    }

    fn agents(&self) -> Vec<Agent> {
        self.manifest
            .agents
            .iter()
            .map(|decl| Agent {
                id: decl.id.clone(),
                name: decl.name.clone(),
                capabilities: decl.capabilities.clone(),
                enabled: self.config.is_agent_enabled(&self.manifest.name, decl.id.as_str()),
                description: decl.description.clone(),
            })
            .collect()
    }

    fn get_agent(&self, agent_id: &AgentId) -> Option<Agent> {
        self.agents().into_iter().find(|a| &a.id == agent_id)
    }

    async fn invoke(&self, agent_id: &AgentId, opts: InvokeOptions) -> Result<Session, PluginError> {
        let session_id = SessionId::generate();
        let plugin_id = nova_core::PluginName::new(self.manifest.name.clone());
        let session = PtySession::spawn(session_id.clone(), agent_id.clone(), plugin_id, opts)
            .map_err(PluginError::Pty)?;

        self.sessions.lock().insert(session_id.clone(), session.clone());

        if let Err(e) = session.await_ready().await {
            self.sessions.lock().remove(&session_id);
            return Err(PluginError::Pty(e));
        }

        info!(session_id = %session_id, plugin = %self.manifest.name, "session ready");
        Ok(session.snapshot())
    }

    async fn message(&self, session_id: &SessionId, text: &str) -> Result<(), PluginError> {
        let session = self.session_or_not_found(session_id)?;
        if session.is_terminal() {
            return Err(PluginError::SessionCompleted(session_id.clone()));
        }
        session.send_input(text).await.map_err(PluginError::Pty)
    }

    fn stream(&self, session_id: &SessionId) -> Option<(Vec<SessionEvent>, broadcast::Receiver<SessionEvent>)> {
        self.sessions.lock().get(session_id).map(|s| s.subscribe_with_replay())
    }

    async fn stop(&self, session_id: &SessionId) -> Result<(), PluginError> {
        let session = self.session_or_not_found(session_id)?;
        session.stop().await.map_err(PluginError::Pty)?;
        self.sessions.lock().remove(session_id);
        Ok(())
    }

    fn get_session(&self, session_id: &SessionId) -> Option<Session> {
        self.sessions.lock().get(session_id).map(|s| s.snapshot())
    }

    fn get_sessions(&self) -> Vec<Session> {
        self.sessions.lock().values().map(|s| s.snapshot()).collect()
    }
}

#[cfg(test)]
#[path = "cli_plugin_tests.rs"]
mod tests;
