// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess binary resolution and argument building (§4.4).

use std::path::{Path, PathBuf};

use nova_core::{AgentId, InvokeOptions, PermissionMode};

use crate::error::PtyError;

/// Absolute paths checked before falling back to a `$PATH` lookup, in the
/// order a typical Claude Code CLI install might be found.
const CANDIDATE_PATHS: &[&str] = &[
    "/usr/local/bin/claude",
    "/opt/homebrew/bin/claude",
    "/usr/bin/claude",
];

const BINARY_NAME: &str = "claude";

/// Locate the wrapped CLI binary. Tries the fixed candidate list first,
/// then searches `$PATH`.
pub fn resolve_binary() -> Result<PathBuf, PtyError> {
    for candidate in CANDIDATE_PATHS {
        let path = Path::new(candidate);
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
    }

    if let Some(path_var) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&path_var) {
            let candidate = dir.join(BINARY_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(PtyError::BinaryNotFound(BINARY_NAME.to_string()))
}

fn permission_mode_flag(mode: PermissionMode) -> &'static str {
    match mode {
        PermissionMode::Default => "default",
        PermissionMode::AcceptEdits => "acceptEdits",
        PermissionMode::BypassPermissions => "bypassPermissions",
        PermissionMode::DontAsk => "dontAsk",
        PermissionMode::Plan => "plan",
    }
}

/// Build the CLI argument vector for one invocation, per §4.4's ordered
/// list of flags.
pub fn build_args(agent_id: &AgentId, opts: &InvokeOptions) -> Vec<String> {
    let mut args = Vec::with_capacity(16);

    args.push("-p".to_string());
    args.push(opts.prompt.clone());

    args.push("--output-format".to_string());
    args.push("stream-json".to_string());

    if opts.verbose {
        args.push("--verbose".to_string());
    }

    // Incremental streaming of partial assistant messages.
    args.push("--include-partial-messages".to_string());

    args.push("--model".to_string());
    args.push(agent_id.as_str().to_string());

    args.push("--permission-mode".to_string());
    args.push(permission_mode_flag(opts.permission_mode).to_string());

    if let Some(resume) = &opts.resume_session_id {
        args.push("--resume".to_string());
        args.push(resume.clone());
        if opts.fork_session {
            args.push("--fork-session".to_string());
        }
    }

    if !opts.allowed_tools.is_empty() {
        args.push("--allowedTools".to_string());
        args.push(opts.allowed_tools.join(","));
    }
    if !opts.disallowed_tools.is_empty() {
        args.push("--disallowedTools".to_string());
        args.push(opts.disallowed_tools.join(","));
    }

    args
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;
