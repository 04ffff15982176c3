// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builder_produces_sensible_defaults() {
    let agent = Agent::builder().build();
    assert_eq!(agent.id, AgentId::new("test-agent"));
    assert_eq!(agent.name, "Test Agent");
    assert!(agent.enabled);
    assert!(agent.capabilities.is_empty());
    assert!(agent.description.is_none());
}

#[test]
fn builder_overrides_fields() {
    let agent = Agent::builder()
        .id("opus")
        .name("Claude Opus")
        .capabilities(vec![Capability::Chat, Capability::Plan])
        .enabled(false)
        .description("most capable")
        .build();
    assert_eq!(agent.id, AgentId::new("opus"));
    assert_eq!(agent.name, "Claude Opus");
    assert!(!agent.enabled);
    assert_eq!(agent.capabilities.len(), 2);
    assert_eq!(agent.description.as_deref(), Some("most capable"));
}
