// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config loading and the enablement-resolution contract (§4.1).

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::warn;

use crate::error::ConfigParseError;
use crate::model::{ConfigFile, ServerConfig};

/// Loads `<base>/nova.config.json` once at construction and on demand via
/// [`ConfigLoader::reload`]. Never fails: a missing or malformed file
/// yields [`ConfigFile::default`].
pub struct ConfigLoader {
    path: PathBuf,
    config: RwLock<ConfigFile>,
}

impl ConfigLoader {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = read_config(&path);
        Self {
            path,
            config: RwLock::new(config),
        }
    }

    /// Re-read the config file from disk, replacing the cached document.
    /// Does not affect already-running sessions (§4.1).
    pub fn reload(&self) {
        let config = read_config(&self.path);
        *self.config.write() = config;
    }

    pub fn is_plugin_enabled(&self, name: &str) -> bool {
        self.config
            .read()
            .plugins
            .get(name)
            .map(|entry| entry.enabled)
            .unwrap_or(true)
    }

    pub fn is_agent_enabled(&self, plugin: &str, agent: &str) -> bool {
        let config = self.config.read();
        let Some(entry) = config.plugins.get(plugin) else {
            return true;
        };
        if !entry.enabled {
            return false;
        }
        entry.agents.get(agent).copied().unwrap_or(true)
    }

    pub fn plugin_options(&self, name: &str) -> serde_json::Value {
        self.config
            .read()
            .plugins
            .get(name)
            .map(|entry| entry.options.clone())
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()))
    }

    /// The configured default agent as `(plugin, agent)`, if set and
    /// well-formed (`"plugin:agent"`).
    pub fn default_agent(&self) -> Option<(String, String)> {
        let raw = self.config.read().defaults.agent.clone()?;
        match raw.split_once(':') {
            Some((plugin, agent)) => Some((plugin.to_string(), agent.to_string())),
            None => {
                warn!(value = %raw, "defaults.agent is not of the form \"plugin:agent\", ignoring");
                None
            }
        }
    }

    pub fn server(&self) -> ServerConfig {
        self.config.read().server.clone()
    }
}

fn read_config(path: &Path) -> ConfigFile {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ConfigFile::default(),
        Err(e) => {
            warn!(error = %ConfigParseError::Io { path: path.to_path_buf(), source: e }, "using default config");
            return ConfigFile::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %ConfigParseError::Parse { path: path.to_path_buf(), source: e }, "using default config");
            ConfigFile::default()
        }
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
