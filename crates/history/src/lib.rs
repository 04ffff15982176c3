// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! nova-history: read-only (plus delete) access to the CLI-owned
//! transcript directory tree (§4.6). This server never writes transcript
//! files; it only decodes, lists, and removes them.

pub mod error;
pub mod path_codec;
pub mod service;

pub use error::HistoryError;
pub use path_codec::{decode_project_id, default_transcript_root};
pub use service::{BulkDeleteResult, HistoryService, SessionSummary, TranscriptRecord};
