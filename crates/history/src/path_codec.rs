// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Encoding/decoding between a project's on-disk transcript directory name
//! and its real filesystem path (§4.6, §6).
//!
//! Decoding is lossy: the encoded name is the path with `/` and `_` both
//! flattened to `-`, so a single `-` cannot be told apart from a former
//! path separator versus a literal underscore. This walks the real
//! filesystem greedily, at each level preferring the directory entry
//! whose own name (again with `_` mapped to `-`) matches the longest
//! prefix of the parts still to be consumed.

use std::path::{Path, PathBuf};

/// Guards the greedy walk against a pathological or adversarial encoded
/// name; real project paths are nowhere near this deep.
const MAX_WALK_DEPTH: usize = 64;

/// Flattens `/` and `_` to `-`. Production never needs this — project
/// directories are created by the wrapped CLI, not by this server — but
/// it is the inverse `decode_project_id` is checked against.
pub(crate) fn encode_project_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel = rel.to_string_lossy().replace(['/', '_'], "-");
    format!("-{rel}")
}

/// Decode an encoded project directory name back to an absolute path by
/// walking `root` on disk. Falls back to joining the unmatched remainder
/// verbatim once no directory entry explains it.
pub fn decode_project_id(encoded: &str, root: &Path) -> PathBuf {
    let parts: Vec<&str> = encoded.split('-').filter(|s| !s.is_empty()).collect();
    let mut current = root.to_path_buf();
    let mut remaining = &parts[..];
    let mut depth = 0;

    while !remaining.is_empty() && depth < MAX_WALK_DEPTH {
        depth += 1;
        let Ok(entries) = std::fs::read_dir(&current) else {
            break;
        };

        let mut best: Option<(usize, String)> = None;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let mapped = name.replace('_', "-");
            let mapped_parts: Vec<&str> = mapped.split('-').collect();
            if mapped_parts.is_empty() || mapped_parts.len() > remaining.len() {
                continue;
            }
            if mapped_parts == remaining[..mapped_parts.len()]
                && best.as_ref().is_none_or(|(n, _)| mapped_parts.len() > *n)
            {
                best = Some((mapped_parts.len(), name));
            }
        }

        match best {
            Some((consumed, name)) => {
                current.push(name);
                remaining = &remaining[consumed..];
            }
            None => break,
        }
    }

    for part in remaining {
        current.push(part);
    }
    current
}

/// `~/.claude/projects` (§6), or `None` if the home directory cannot be
/// resolved.
pub fn default_transcript_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claude").join("projects"))
}

#[cfg(test)]
#[path = "path_codec_tests.rs"]
mod tests;
