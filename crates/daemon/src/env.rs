// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate (§6).

use std::path::{Path, PathBuf};

/// `NOVA_PORT`, default 8080.
pub fn port() -> u16 {
    port_override().unwrap_or(8080)
}

/// `NOVA_PORT` if set and well-formed, otherwise `None`. Used by `main` to
/// slot the environment into the flags > env > file-config precedence
/// chain (§2a) beneath a configured `server.port`.
pub fn port_override() -> Option<u16> {
    std::env::var("NOVA_PORT").ok().and_then(|s| s.parse().ok())
}

/// `NOVA_BASE_PATH`, default the parent of the current working directory.
pub fn base_path() -> PathBuf {
    std::env::var("NOVA_BASE_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        std::env::current_dir()
            .ok()
            .and_then(|cwd| cwd.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Bearer token required on non-loopback binds. Absent means auth is not
/// enforced (only safe for a loopback bind; callers check this).
pub fn auth_token() -> Option<String> {
    std::env::var("NOVA_AUTH_TOKEN").ok().filter(|s| !s.is_empty())
}

/// `tracing_subscriber::EnvFilter` directive string, default `info`.
pub fn log_directive() -> String {
    std::env::var("NOVA_LOG").unwrap_or_else(|_| "info".to_string())
}

/// Base directory for on-disk diagnostics (e.g. log files). Defaults to a
/// platform state directory.
pub fn state_dir() -> PathBuf {
    std::env::var("NOVA_STATE_DIR").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("nova")
    })
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
