// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use tempfile::NamedTempFile;
use yare::parameterized;

use super::*;

fn loader_with(json: &str) -> (NamedTempFile, ConfigLoader) {
    let mut file = NamedTempFile::new().expect("tempfile");
    file.write_all(json.as_bytes()).expect("write");
    let loader = ConfigLoader::load(file.path());
    (file, loader)
}

#[test]
fn missing_file_yields_defaults() {
    let loader = ConfigLoader::load("/nonexistent/nova.config.json");
    assert!(loader.is_plugin_enabled("anything"));
    assert_eq!(loader.server().port, 8080);
}

#[test]
fn malformed_file_yields_defaults() {
    let (_file, loader) = loader_with("{ not json");
    assert!(loader.is_plugin_enabled("anything"));
    assert!(loader.default_agent().is_none());
}

#[parameterized(
    unlisted_plugin = { r#"{"plugins":{}}"#, "claude_cli", "sonnet", true },
    disabled_plugin = { r#"{"plugins":{"claude_cli":{"enabled":false}}}"#, "claude_cli", "sonnet", false },
    enabled_plugin_unlisted_agent = { r#"{"plugins":{"claude_cli":{"enabled":true}}}"#, "claude_cli", "sonnet", true },
    enabled_plugin_disabled_agent = { r#"{"plugins":{"claude_cli":{"enabled":true,"agents":{"opus":false}}}}"#, "claude_cli", "opus", false },
    enabled_plugin_enabled_agent = { r#"{"plugins":{"claude_cli":{"enabled":true,"agents":{"opus":true}}}}"#, "claude_cli", "opus", true },
)]
fn agent_enablement_resolution(json: &str, plugin: &str, agent: &str, expected: bool) {
    let (_file, loader) = loader_with(json);
    assert_eq!(loader.is_agent_enabled(plugin, agent), expected);
}

#[test]
fn default_agent_parses_plugin_colon_agent() {
    let (_file, loader) = loader_with(r#"{"defaults":{"agent":"claude_cli:sonnet"}}"#);
    assert_eq!(
        loader.default_agent(),
        Some(("claude_cli".to_string(), "sonnet".to_string()))
    );
}

#[test]
fn default_agent_without_colon_is_ignored() {
    let (_file, loader) = loader_with(r#"{"defaults":{"agent":"sonnet"}}"#);
    assert_eq!(loader.default_agent(), None);
}

#[test]
fn plugin_options_returns_empty_object_when_absent() {
    let (_file, loader) = loader_with(r#"{"plugins":{}}"#);
    assert_eq!(loader.plugin_options("claude_cli"), serde_json::json!({}));
}

#[test]
fn plugin_options_returns_configured_value() {
    let (_file, loader) = loader_with(
        r#"{"plugins":{"claude_cli":{"options":{"timeout_ms":1000}}}}"#,
    );
    assert_eq!(
        loader.plugin_options("claude_cli"),
        serde_json::json!({"timeout_ms": 1000})
    );
}

#[test]
fn reload_picks_up_changes_on_disk() {
    let mut file = NamedTempFile::new().expect("tempfile");
    file.write_all(br#"{"plugins":{"claude_cli":{"enabled":true}}}"#)
        .expect("write");
    let loader = ConfigLoader::load(file.path());
    assert!(loader.is_plugin_enabled("claude_cli"));

    let mut file = file.reopen().expect("reopen");
    file.set_len(0).expect("truncate");
    use std::io::Seek;
    file.seek(std::io::SeekFrom::Start(0)).expect("seek");
    file.write_all(br#"{"plugins":{"claude_cli":{"enabled":false}}}"#)
        .expect("overwrite");

    loader.reload();
    assert!(!loader.is_plugin_enabled("claude_cli"));
}

#[test]
fn server_config_defaults() {
    let (_file, loader) = loader_with(r#"{}"#);
    let server = loader.server();
    assert_eq!(server.port, 8080);
    assert_eq!(server.host, "127.0.0.1");
}
