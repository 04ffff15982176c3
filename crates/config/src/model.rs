// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shape of `<base>/nova.config.json` (§4.1, §6).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfigEntry {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub agents: HashMap<String, bool>,
    #[serde(default)]
    pub options: serde_json::Value,
}

impl Default for PluginConfigEntry {
    fn default() -> Self {
        Self {
            enabled: true,
            agents: HashMap::new(),
            options: serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    /// `"plugin:agent"`, the agent selected when a client omits one.
    #[serde(default)]
    pub agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// The full document. Every field is optional on disk; an absent or
/// unparseable file yields `ConfigFile::default()` in full.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub plugins: HashMap<String, PluginConfigEntry>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub server: ServerConfig,
}
