// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure modes for a PTY session (§7). `OutputParseError` and
//! `BufferOverflow` are non-fatal: the caller folds them into an `output`
//! event and keeps the session alive.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PtyError {
    #[error("binary not found on any candidate path or $PATH: {0}")]
    BinaryNotFound(String),

    #[error("project path does not exist or is not a directory: {}", .0.display())]
    ProjectPathMissing(std::path::PathBuf),

    #[error("failed to spawn subprocess: {0}")]
    SpawnFailure(#[source] std::io::Error),

    #[error("failed to open pty: {0}")]
    OpenPtyFailure(String),

    #[error("timed out waiting {0:?} for the subprocess init message")]
    UpstreamInitTimeout(std::time::Duration),

    #[error("session already terminated")]
    AlreadyTerminated,
}
