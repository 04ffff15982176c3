// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin discovery (§4.2): scans a plugins directory for manifests,
//! validates and filters by configuration, and constructs the concrete
//! plugin for each recognized `source`.
//!
//! A real dynamic-loading story (load the entry module, obtain a factory
//! callable) has no equivalent in a statically-linked binary. This is
//! realized instead as a small closed registry of compiled-in plugin
//! constructors keyed by manifest `source`; today only `source = "cli"`
//! has a constructor.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use nova_config::ConfigLoader;
use nova_core::{ManifestError, PluginManifest, PluginSource};

use crate::cli_plugin::CliPlugin;
use crate::error::PluginError;
use crate::plugin_trait::Plugin;
use crate::registry::PluginRegistry;

const MANIFEST_FILE: &str = "plugin.json";

pub struct PluginLoader {
    plugins_dir: PathBuf,
    config: Arc<ConfigLoader>,
}

impl PluginLoader {
    pub fn new(plugins_dir: impl Into<PathBuf>, config: Arc<ConfigLoader>) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
            config,
        }
    }

    /// Scans every subdirectory of the plugins directory, loads and
    /// registers each valid, enabled plugin. Failures are logged and
    /// skipped; one broken plugin never aborts discovery of the rest.
    pub async fn discover(&self, registry: &PluginRegistry) {
        let entries = match std::fs::read_dir(&self.plugins_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.plugins_dir.display(), error = %e, "plugins directory unreadable, skipping discovery");
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match self.load_plugin(&path).await {
                Ok(Some(plugin)) => registry.register(plugin),
                Ok(None) => {}
                Err(e) => warn!(dir = %path.display(), error = %e, "failed to load plugin, skipping"),
            }
        }
    }

    /// `Ok(None)` means the manifest was valid but the plugin is disabled
    /// by configuration; that is not an error condition.
    async fn load_plugin(&self, dir: &Path) -> Result<Option<Arc<dyn Plugin>>, PluginError> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = read_manifest(&manifest_path)?;
        manifest.validate()?;

        if !self.config.is_plugin_enabled(&manifest.name) {
            info!(plugin = %manifest.name, "plugin disabled by configuration, skipping");
            return Ok(None);
        }

        let plugin = self.construct(manifest)?;
        plugin.initialize().await?;
        info!(plugin = %plugin.name(), "plugin loaded");
        Ok(Some(plugin))
    }

    fn construct(&self, manifest: PluginManifest) -> Result<Arc<dyn Plugin>, PluginError> {
        match manifest.source {
            PluginSource::Cli => Ok(Arc::new(CliPlugin::new(manifest, self.config.clone()))),
            other => Err(PluginError::LoadError(format!(
                "no constructor registered for plugin source {other:?}"
            ))),
        }
    }

    /// Shuts every registered plugin down, then re-runs discovery.
    /// Running sessions do not survive a reload (§4.2, §9).
    pub async fn reload(&self, registry: &PluginRegistry) {
        registry.shutdown().await;
        self.discover(registry).await;
    }
}

fn read_manifest(path: &Path) -> Result<PluginManifest, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
