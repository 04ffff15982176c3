// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only (plus delete) access to the transcript directory tree
//! (§4.6). Every operation touches the filesystem and is therefore run
//! via [`tokio::task::spawn_blocking`] (§5: filesystem I/O is a
//! suspension point, never held inline on an async handler).

use std::path::{Path, PathBuf};

use tracing::warn;

use nova_core::Project;

use crate::error::HistoryError;
use crate::path_codec::decode_project_id;

/// One line of a transcript file, kept verbatim (§4.6: "returns a list of
/// records verbatim").
pub type TranscriptRecord = serde_json::Value;

#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub name: String,
    pub message_count: usize,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Outcome of a bulk delete (§8 P8): every requested id lands in exactly
/// one of the two sets.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct BulkDeleteResult {
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Clone)]
pub struct HistoryService {
    transcript_root: PathBuf,
}

impl HistoryService {
    pub fn new(transcript_root: impl Into<PathBuf>) -> Self {
        Self {
            transcript_root: transcript_root.into(),
        }
    }

    pub fn home_directory() -> Option<PathBuf> {
        dirs::home_dir()
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, HistoryError> {
        let root = self.transcript_root.clone();
        tokio::task::spawn_blocking(move || list_projects_blocking(&root))
            .await
            .map_err(|e| HistoryError::Io(std::io::Error::other(e)))?
    }

    pub async fn project_sessions(&self, project_id: &str) -> Result<Vec<SessionSummary>, HistoryError> {
        let dir = self.project_dir(project_id)?;
        tokio::task::spawn_blocking(move || project_sessions_blocking(&dir))
            .await
            .map_err(|e| HistoryError::Io(std::io::Error::other(e)))?
    }

    pub async fn load_history(
        &self,
        project_id: &str,
        session_id: &str,
    ) -> Result<Vec<TranscriptRecord>, HistoryError> {
        let path = self.session_path(project_id, session_id)?;
        tokio::task::spawn_blocking(move || load_history_blocking(&path))
            .await
            .map_err(|e| HistoryError::Io(std::io::Error::other(e)))?
    }

    pub async fn delete_session(&self, project_id: &str, session_id: &str) -> Result<(), HistoryError> {
        let path = self.session_path(project_id, session_id)?;
        tokio::task::spawn_blocking(move || std::fs::remove_file(&path))
            .await
            .map_err(|e| HistoryError::Io(std::io::Error::other(e)))?
            .map_err(HistoryError::Io)
    }

    /// Partial failure is reported per-id, never surfaced as a single
    /// error for the whole batch (§7, §8 P8).
    pub async fn delete_bulk(&self, project_id: &str, session_ids: Vec<String>) -> BulkDeleteResult {
        let mut result = BulkDeleteResult::default();
        for id in session_ids {
            match self.delete_session(project_id, &id).await {
                Ok(()) => result.deleted.push(id),
                Err(e) => {
                    warn!(project_id, session_id = %id, error = %e, "bulk delete failed for session");
                    result.failed.push(id);
                }
            }
        }
        result
    }

    fn project_dir(&self, project_id: &str) -> Result<PathBuf, HistoryError> {
        let dir = self.transcript_root.join(project_id);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(HistoryError::ProjectNotFound(project_id.to_string()))
        }
    }

    fn session_path(&self, project_id: &str, session_id: &str) -> Result<PathBuf, HistoryError> {
        let dir = self.project_dir(project_id)?;
        Ok(dir.join(format!("{session_id}.jsonl")))
    }
}

fn list_projects_blocking(root: &Path) -> Result<Vec<Project>, HistoryError> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(HistoryError::Io(e)),
    };

    let mut projects = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let id = entry.file_name().to_string_lossy().into_owned();
        let decoded_path = decode_project_id(&id, Path::new("/"));
        let session_count = count_jsonl_files(&path);
        let last_modified = stat_modified_ms(&path);
        let name = decoded_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.clone());

        projects.push(Project {
            id,
            name,
            path: decoded_path,
            last_modified,
            session_count,
        });
    }

    projects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    Ok(projects)
}

fn project_sessions_blocking(dir: &Path) -> Result<Vec<SessionSummary>, HistoryError> {
    let mut sessions = Vec::new();
    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            continue;
        }
        let Some(id) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        let content = std::fs::read_to_string(&path)?;
        let message_count = content.lines().filter(|l| !l.trim().is_empty()).count();
        let name = content
            .lines()
            .find(|l| !l.trim().is_empty())
            .map(display_name_from_line)
            .unwrap_or_else(|| id.clone());

        let created_at = stat_created_ms(&path);
        let updated_at = stat_modified_ms(&path);

        sessions.push(SessionSummary {
            id,
            name,
            message_count,
            created_at,
            updated_at,
        });
    }
    sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(sessions)
}

/// Truncate to 50 chars and collapse newlines (§4.6), falling back to the
/// raw line when it is not an object with a readable summary field.
fn display_name_from_line(line: &str) -> String {
    let text = serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|record| message_summary(&record))
        .unwrap_or_else(|| line.to_string());
    let collapsed = text.replace(['\n', '\r'], " ");
    collapsed.chars().take(50).collect()
}

/// Pulls readable text out of a transcript record's `message.content`,
/// which is either a plain string or a list of content blocks (only
/// `text` blocks carry a summary worth showing).
fn message_summary(record: &serde_json::Value) -> Option<String> {
    let content = record.get("message")?.get("content")?;
    match content {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Array(blocks) => blocks
            .iter()
            .find_map(|block| block.get("text").and_then(serde_json::Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

fn load_history_blocking(path: &Path) -> Result<Vec<TranscriptRecord>, HistoryError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Err(HistoryError::SessionNotFound(id));
        }
        Err(e) => return Err(HistoryError::Io(e)),
    };

    let mut records = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unparseable transcript line"),
        }
    }
    Ok(records)
}

fn count_jsonl_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("jsonl"))
                .count()
        })
        .unwrap_or(0)
}

fn stat_modified_ms(path: &Path) -> u64 {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn stat_created_ms(path: &Path) -> u64 {
    std::fs::metadata(path)
        .and_then(|m| m.created())
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|| stat_modified_ms(path))
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
