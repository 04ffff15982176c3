// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use tempfile::{NamedTempFile, TempDir};

use super::*;

fn write_manifest(dir: &std::path::Path, name: &str, json: &str) {
    let plugin_dir = dir.join(name);
    std::fs::create_dir_all(&plugin_dir).expect("mkdir");
    std::fs::write(plugin_dir.join(MANIFEST_FILE), json).expect("write manifest");
}

const VALID_MANIFEST: &str = r#"{
    "name": "claude_cli",
    "version": "1.0.0",
    "type": "llm",
    "source": "cli",
    "capabilities": ["chat"],
    "entry_point": "claude_cli::plugin",
    "agents": [{"id": "sonnet", "name": "Claude Sonnet"}]
}"#;

fn config(json: &str) -> (NamedTempFile, Arc<ConfigLoader>) {
    let mut file = NamedTempFile::new().expect("tempfile");
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write");
    let loader = ConfigLoader::load(file.path());
    (file, Arc::new(loader))
}

#[tokio::test]
async fn discover_registers_a_valid_enabled_plugin() {
    let dir = TempDir::new().expect("tempdir");
    write_manifest(dir.path(), "claude_cli", VALID_MANIFEST);
    let (_cfg, config) = config("{}");

    let loader = PluginLoader::new(dir.path(), config);
    let registry = PluginRegistry::new();
    loader.discover(&registry).await;

    assert_eq!(registry.plugins().len(), 1);
    assert_eq!(registry.plugins()[0].name, "claude_cli");
}

#[tokio::test]
async fn discover_skips_a_disabled_plugin() {
    let dir = TempDir::new().expect("tempdir");
    write_manifest(dir.path(), "claude_cli", VALID_MANIFEST);
    let (_cfg, config) = config(r#"{"plugins":{"claude_cli":{"enabled":false}}}"#);

    let loader = PluginLoader::new(dir.path(), config);
    let registry = PluginRegistry::new();
    loader.discover(&registry).await;

    assert!(registry.plugins().is_empty());
}

#[tokio::test]
async fn discover_skips_a_malformed_manifest_without_aborting() {
    let dir = TempDir::new().expect("tempdir");
    write_manifest(dir.path(), "broken", "not json");
    write_manifest(dir.path(), "claude_cli", VALID_MANIFEST);
    let (_cfg, config) = config("{}");

    let loader = PluginLoader::new(dir.path(), config);
    let registry = PluginRegistry::new();
    loader.discover(&registry).await;

    assert_eq!(registry.plugins().len(), 1);
    assert_eq!(registry.plugins()[0].name, "claude_cli");
}

#[tokio::test]
async fn discover_rejects_an_unsupported_source() {
    let dir = TempDir::new().expect("tempdir");
    write_manifest(
        dir.path(),
        "remote_thing",
        r#"{
            "name": "remote_thing",
            "version": "1.0.0",
            "type": "llm",
            "source": "grpc",
            "entry_point": "remote::plugin",
            "agents": [{"id": "x", "name": "X"}]
        }"#,
    );
    let (_cfg, config) = config("{}");

    let loader = PluginLoader::new(dir.path(), config);
    let registry = PluginRegistry::new();
    loader.discover(&registry).await;

    assert!(registry.plugins().is_empty());
}

#[tokio::test]
async fn discover_ignores_a_missing_plugins_directory() {
    let (_cfg, config) = config("{}");
    let loader = PluginLoader::new("/nonexistent/plugins/dir", config);
    let registry = PluginRegistry::new();
    loader.discover(&registry).await;
    assert!(registry.plugins().is_empty());
}

#[tokio::test]
async fn reload_shuts_down_and_rediscovers() {
    let dir = TempDir::new().expect("tempdir");
    write_manifest(dir.path(), "claude_cli", VALID_MANIFEST);
    let (_cfg, config) = config("{}");

    let loader = PluginLoader::new(dir.path(), config);
    let registry = PluginRegistry::new();
    loader.discover(&registry).await;
    assert_eq!(registry.plugins().len(), 1);

    loader.reload(&registry).await;
    assert_eq!(registry.plugins().len(), 1);
}
