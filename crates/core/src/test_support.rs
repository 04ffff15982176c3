// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for tests in this crate and downstream crates (enabled
//! via the `test-support` feature). Prefer the per-type `builder()` methods
//! for one-off customization; use these factories when a test just needs
//! "a plausible whole object" and doesn't care about the specifics.

use crate::agent::Agent;
use crate::ids::PluginName;
use crate::manifest::{AgentDecl, Capability, PluginManifest, PluginSource, PluginType};
use crate::project::Project;
use crate::session::{Session, SessionState};

/// A manifest for a plugin named `claude_cli` with two agents, `sonnet` and
/// `opus`, mirroring the shape used throughout §4 of the design.
pub fn sample_manifest() -> PluginManifest {
    PluginManifest {
        name: "claude_cli".into(),
        version: "1.0.0".into(),
        plugin_type: PluginType::Llm,
        source: PluginSource::Cli,
        capabilities: vec![Capability::Chat, Capability::Tools],
        entry_point: "claude_cli::plugin".into(),
        agents: vec![
            AgentDecl {
                id: "sonnet".into(),
                name: "Claude Sonnet".into(),
                capabilities: vec![Capability::Chat],
                description: None,
            },
            AgentDecl {
                id: "opus".into(),
                name: "Claude Opus".into(),
                capabilities: vec![Capability::Chat, Capability::Plan],
                description: Some("Most capable model".into()),
            },
        ],
    }
}

pub fn sample_agent() -> Agent {
    Agent::builder()
        .id("sonnet")
        .name("Claude Sonnet")
        .capabilities(vec![Capability::Chat])
        .build()
}

pub fn sample_session() -> Session {
    Session::builder()
        .id("s-test-1")
        .agent_id("sonnet")
        .plugin_id(PluginName::new("claude_cli"))
        .state(SessionState::Ready)
        .build()
}

pub fn sample_project() -> Project {
    Project::builder()
        .id("-Users-u-demo")
        .name("demo")
        .session_count(2)
        .build()
}
