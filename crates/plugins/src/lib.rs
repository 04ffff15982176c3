// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cli_plugin;
pub mod error;
pub mod loader;
pub mod plugin_trait;
pub mod registry;

pub use cli_plugin::CliPlugin;
pub use error::PluginError;
pub use loader::PluginLoader;
pub use plugin_trait::{AgentSummary, Plugin, PluginSummary, PluginSummaryAgent};
pub use registry::PluginRegistry;
