// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A sub-identity exposed by a plugin (e.g. a model variant), selected at
//! invocation time. Created during plugin init from the manifest
//! cross-referenced with configuration; never mutated thereafter.

use serde::{Deserialize, Serialize};

use crate::ids::AgentId;
use crate::manifest::Capability;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub capabilities: Vec<Capability>,
    pub enabled: bool,
    pub description: Option<String>,
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct AgentBuilder => Agent {
        into {
            id: AgentId = AgentId::new("test-agent"),
            name: String = "Test Agent",
        }
        set {
            capabilities: Vec<Capability> = Vec::new(),
            enabled: bool = true,
        }
        option { description: String = None }
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
