// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Internal failure modes for config loading. Never surfaced to callers of
//! [`crate::ConfigLoader`] — a malformed or unreadable file degrades to
//! defaults (§4.1) — but kept as a typed enum so the fallback path logs a
//! specific reason rather than a stringly-typed message.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigParseError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
