// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative plugin manifest, parsed from each plugin directory's
//! `plugin.json` and validated before a plugin is registered.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::ids::AgentId;

/// A single capability a plugin or agent advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Chat,
    Tools,
    Plan,
    Code,
    Realtime,
    Vision,
}

/// Where a plugin's implementation lives. Only `Cli` is constructible today
/// (see [`crate::manifest`] module docs); the others are recognized so that
/// manifest validation can distinguish "unsupported source" from "unknown
/// source" — today both leave the plugin unregistered, the latter rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginSource {
    Cli,
    Api,
    Adk,
    Local,
    Grpc,
}

/// The kind of backend a plugin fronts. Only one value exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    Llm,
}

/// One agent (model variant) declared by a plugin's manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDecl {
    pub id: AgentId,
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Declarative record for one plugin directory (`plugin.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub plugin_type: PluginType,
    pub source: PluginSource,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    pub entry_point: String,
    pub agents: Vec<AgentDecl>,
}

impl PluginManifest {
    /// Reject manifests missing required fields or carrying duplicate
    /// agent ids. Unknown `source`/`capabilities` values are already
    /// rejected at JSON-deserialization time since both are closed enums.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.name.trim().is_empty() {
            return Err(ManifestError::MissingField("name"));
        }
        if self.version.trim().is_empty() {
            return Err(ManifestError::MissingField("version"));
        }
        if self.entry_point.trim().is_empty() {
            return Err(ManifestError::MissingField("entry_point"));
        }
        if self.agents.is_empty() {
            return Err(ManifestError::MissingField("agents"));
        }

        let mut seen = HashSet::with_capacity(self.agents.len());
        for agent in &self.agents {
            if agent.id.as_str().trim().is_empty() {
                return Err(ManifestError::MissingField("agents[].id"));
            }
            if !seen.insert(agent.id.clone()) {
                return Err(ManifestError::DuplicateAgentId(agent.id.clone()));
            }
        }

        Ok(())
    }
}

/// Manifest parse/validation failure. All variants are logged and the
/// offending plugin is skipped; discovery continues with the rest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("manifest missing or empty required field: {0}")]
    MissingField(&'static str),
    #[error("duplicate agent id in manifest: {0}")]
    DuplicateAgentId(AgentId),
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
