// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tempfile::TempDir;

use super::*;

fn write_session(root: &Path, project: &str, session: &str, lines: &[&str]) {
    let dir = root.join(project);
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join(format!("{session}.jsonl")), lines.join("\n")).expect("write");
}

#[tokio::test]
async fn list_projects_counts_sessions_and_sorts_by_recency() {
    let root = TempDir::new().expect("tempdir");
    write_session(root.path(), "-tmp-a", "s1", &[r#"{"type":"system"}"#]);
    write_session(root.path(), "-tmp-a", "s2", &[r#"{"type":"system"}"#]);
    write_session(root.path(), "-tmp-b", "s3", &[r#"{"type":"system"}"#]);

    let service = HistoryService::new(root.path());
    let projects = service.list_projects().await.expect("list");

    assert_eq!(projects.len(), 2);
    let a = projects.iter().find(|p| p.id == "-tmp-a").expect("project a");
    assert_eq!(a.session_count, 2);
}

#[tokio::test]
async fn list_projects_on_missing_root_yields_empty() {
    let service = HistoryService::new(PathBuf::from("/nonexistent/transcript/root"));
    let projects = service.list_projects().await.expect("list");
    assert!(projects.is_empty());
}

#[tokio::test]
async fn project_sessions_derives_name_and_message_count() {
    let root = TempDir::new().expect("tempdir");
    write_session(
        root.path(),
        "-tmp-a",
        "s1",
        &[r#"{"type":"user","message":{"content":"hello there"}}"#, r#"{"type":"result"}"#],
    );

    let service = HistoryService::new(root.path());
    let sessions = service.project_sessions("-tmp-a").await.expect("sessions");

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, "s1");
    assert_eq!(sessions[0].message_count, 2);
    assert!(sessions[0].name.contains("hello there"));
}

#[tokio::test]
async fn project_sessions_unknown_project_errors() {
    let root = TempDir::new().expect("tempdir");
    let service = HistoryService::new(root.path());
    let result = service.project_sessions("-missing").await;
    assert!(matches!(result, Err(HistoryError::ProjectNotFound(_))));
}

#[tokio::test]
async fn load_history_parses_every_line_verbatim() {
    let root = TempDir::new().expect("tempdir");
    write_session(
        root.path(),
        "-tmp-a",
        "s1",
        &[r#"{"type":"system","subtype":"init"}"#, "", r#"{"type":"result"}"#],
    );

    let service = HistoryService::new(root.path());
    let records = service.load_history("-tmp-a", "s1").await.expect("history");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["type"], "system");
}

#[tokio::test]
async fn load_history_is_idempotent() {
    let root = TempDir::new().expect("tempdir");
    write_session(root.path(), "-tmp-a", "s1", &[r#"{"type":"system"}"#]);

    let service = HistoryService::new(root.path());
    let first = service.load_history("-tmp-a", "s1").await.expect("first");
    let second = service.load_history("-tmp-a", "s1").await.expect("second");
    assert_eq!(first, second);
}

#[tokio::test]
async fn load_history_skips_unparseable_lines() {
    let root = TempDir::new().expect("tempdir");
    write_session(root.path(), "-tmp-a", "s1", &[r#"{"type":"system"}"#, "not json", r#"{"type":"result"}"#]);

    let service = HistoryService::new(root.path());
    let records = service.load_history("-tmp-a", "s1").await.expect("history");
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn load_history_missing_file_is_not_found() {
    let root = TempDir::new().expect("tempdir");
    write_session(root.path(), "-tmp-a", "s1", &[r#"{"type":"system"}"#]);

    let service = HistoryService::new(root.path());
    let result = service.load_history("-tmp-a", "missing").await;
    assert!(matches!(result, Err(HistoryError::SessionNotFound(_))));
}

#[tokio::test]
async fn delete_bulk_partitions_deleted_and_failed() {
    let root = TempDir::new().expect("tempdir");
    write_session(root.path(), "-tmp-a", "a", &[r#"{"type":"system"}"#]);
    write_session(root.path(), "-tmp-a", "b", &[r#"{"type":"system"}"#]);

    let service = HistoryService::new(root.path());
    let result = service
        .delete_bulk("-tmp-a", vec!["a".to_string(), "c".to_string()])
        .await;

    assert_eq!(result.deleted, vec!["a".to_string()]);
    assert_eq!(result.failed, vec!["c".to_string()]);
    assert!(root.path().join("-tmp-a/b.jsonl").exists());
    assert!(!root.path().join("-tmp-a/a.jsonl").exists());
}
