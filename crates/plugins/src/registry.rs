// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Central broker holding loaded plugins and the session → plugin map
//! (§4.3). The map is the single source of truth for routing; every method
//! here keeps it consistent with plugins' own session maps at return time.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{info, warn};

use nova_core::{Agent, AgentId, InvokeOptions, Session, SessionEvent, SessionId};

use crate::error::PluginError;
use crate::plugin_trait::{AgentSummary, Plugin, PluginSummary, PluginSummaryAgent};

#[derive(Default)]
pub struct PluginRegistry {
    plugins: Mutex<HashMap<String, Arc<dyn Plugin>>>,
    sessions: Mutex<HashMap<SessionId, String>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent-replace on duplicate name.
    pub fn register(&self, plugin: Arc<dyn Plugin>) {
        let name = plugin.name().to_string();
        if self.plugins.lock().insert(name.clone(), plugin).is_some() {
            warn!(plugin = %name, "replacing already-registered plugin");
        }
        info!(plugin = %name, "plugin registered");
    }

    /// Shuts the plugin down, drops all of its session mappings. Errors
    /// during shutdown are the plugin's own concern to log; this never
    /// propagates one.
    pub async fn unregister(&self, name: &str) {
        let Some(plugin) = self.plugins.lock().remove(name) else {
            return;
        };
        plugin.shutdown().await;
        self.sessions.lock().retain(|_, owner| owner != name);
        info!(plugin = %name, "plugin unregistered");
    }

    pub fn plugins(&self) -> Vec<PluginSummary> {
        self.plugins
            .lock()
            .values()
            .map(|plugin| {
                let manifest = plugin.manifest();
                PluginSummary {
                    name: manifest.name.clone(),
                    plugin_type: manifest.plugin_type,
                    source: manifest.source,
                    supports: manifest.capabilities.clone(),
                    agents: plugin
                        .agents()
                        .into_iter()
                        .map(|a| PluginSummaryAgent {
                            id: a.id,
                            name: a.name,
                            capabilities: a.capabilities,
                        })
                        .collect(),
                }
            })
            .collect()
    }

    /// Filters out disabled agents.
    pub fn agents(&self) -> Vec<AgentSummary> {
        self.plugins
            .lock()
            .values()
            .flat_map(|plugin| {
                let plugin_name = plugin.name().to_string();
                plugin
                    .agents()
                    .into_iter()
                    .filter(|a| a.enabled)
                    .map(move |a| AgentSummary {
                        plugin: plugin_name.clone(),
                        id: a.id,
                        name: a.name,
                        capabilities: a.capabilities,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn agent_or_not_found(&self, plugin: &Arc<dyn Plugin>, plugin_name: &str, agent_id: &AgentId) -> Result<Agent, PluginError> {
        plugin.get_agent(agent_id).ok_or_else(|| PluginError::AgentNotFound {
            plugin: plugin_name.to_string(),
            agent: agent_id.as_str().to_string(),
        })
    }

    pub async fn invoke(
        &self,
        plugin_name: &str,
        agent_id: &AgentId,
        opts: InvokeOptions,
    ) -> Result<Session, PluginError> {
        let plugin = self
            .plugins
            .lock()
            .get(plugin_name)
            .cloned()
            .ok_or_else(|| PluginError::PluginNotFound(plugin_name.to_string()))?;

        let agent = self.agent_or_not_found(&plugin, plugin_name, agent_id)?;
        if !agent.enabled {
            return Err(PluginError::AgentDisabled {
                plugin: plugin_name.to_string(),
                agent: agent_id.as_str().to_string(),
            });
        }

        let session = plugin.invoke(agent_id, opts).await?;
        self.sessions.lock().insert(session.id.clone(), plugin_name.to_string());
        info!(session_id = %session.id, plugin = %plugin_name, "session created");
        Ok(session)
    }

    pub async fn message(&self, session_id: &SessionId, text: &str) -> Result<(), PluginError> {
        let plugin = self.owning_plugin(session_id)?;
        plugin.message(session_id, text).await
    }

    /// `None` if the session is unknown; callers treat that as a no-op.
    /// The returned backlog covers everything emitted before this call.
    pub fn stream(&self, session_id: &SessionId) -> Option<(Vec<SessionEvent>, broadcast::Receiver<SessionEvent>)> {
        let plugin_name = self.sessions.lock().get(session_id).cloned()?;
        let plugin = self.plugins.lock().get(&plugin_name).cloned()?;
        plugin.stream(session_id)
    }

    /// An absent session is a warning, not an error (§4.3).
    pub async fn stop(&self, session_id: &SessionId) -> Result<(), PluginError> {
        let plugin_name = match self.sessions.lock().get(session_id).cloned() {
            Some(name) => name,
            None => {
                warn!(session_id = %session_id, "stop requested for unknown session");
                return Ok(());
            }
        };
        let plugin = self.plugins.lock().get(&plugin_name).cloned();
        if let Some(plugin) = plugin {
            plugin.stop(session_id).await?;
        }
        self.sessions.lock().remove(session_id);
        info!(session_id = %session_id, "session ended");
        Ok(())
    }

    pub fn get_session(&self, session_id: &SessionId) -> Option<Session> {
        let plugin_name = self.sessions.lock().get(session_id).cloned()?;
        self.plugins.lock().get(&plugin_name)?.get_session(session_id)
    }

    pub fn get_sessions(&self) -> Vec<Session> {
        self.plugins.lock().values().flat_map(|p| p.get_sessions()).collect()
    }

    pub async fn shutdown(&self) {
        let plugins: Vec<_> = self.plugins.lock().drain().map(|(_, p)| p).collect();
        futures_util::future::join_all(plugins.iter().map(|p| p.shutdown())).await;
        self.sessions.lock().clear();
    }

    fn owning_plugin(&self, session_id: &SessionId) -> Result<Arc<dyn Plugin>, PluginError> {
        let plugin_name = self
            .sessions
            .lock()
            .get(session_id)
            .cloned()
            .ok_or_else(|| PluginError::SessionNotFound(session_id.clone()))?;
        self.plugins
            .lock()
            .get(&plugin_name)
            .cloned()
            .ok_or_else(|| PluginError::SessionNotFound(session_id.clone()))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
