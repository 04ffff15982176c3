// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;

use nova_core::{AgentId, FakeClock, InvokeOptions, PluginName, SessionEventType, SessionId, SessionStatus};
use serial_test::serial;
use tempfile::TempDir;

use super::*;

/// Installs a shell script named `claude` on `$PATH` for the duration of
/// the guard, restoring the previous value on drop. Tests using this are
/// `#[serial]` since `$PATH` is process-global.
struct FakeClaude {
    _dir: TempDir,
    old_path: Option<std::ffi::OsString>,
}

impl FakeClaude {
    fn new(script: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let bin = dir.path().join("claude");
        let mut file = std::fs::File::create(&bin).expect("create fake claude");
        file.write_all(script.as_bytes()).expect("write script");
        file.set_permissions(std::fs::Permissions::from_mode(0o755))
            .expect("chmod");

        let old_path = std::env::var_os("PATH");
        let mut new_path = dir.path().as_os_str().to_owned();
        if let Some(old) = &old_path {
            new_path.push(":");
            new_path.push(old);
        }
        std::env::set_var("PATH", &new_path);

        Self { _dir: dir, old_path }
    }
}

impl Drop for FakeClaude {
    fn drop(&mut self) {
        match self.old_path.take() {
            Some(p) => std::env::set_var("PATH", p),
            None => std::env::remove_var("PATH"),
        }
    }
}

fn invoke_opts(project_path: std::path::PathBuf) -> InvokeOptions {
    InvokeOptions {
        prompt: "hello".to_string(),
        project_path,
        resume_session_id: None,
        fork_session: false,
        permission_mode: Default::default(),
        verbose: false,
        allowed_tools: Vec::new(),
        disallowed_tools: Vec::new(),
    }
}

async fn recv_until(
    rx: &mut broadcast::Receiver<SessionEvent>,
    event_type: SessionEventType,
) -> SessionEvent {
    loop {
        let evt = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("channel closed");
        if evt.event_type == event_type {
            return evt;
        }
    }
}

#[tokio::test]
async fn missing_project_path_errors() {
    let opts = invoke_opts(std::path::PathBuf::from("/nonexistent/project/path"));
    let result = PtySession::spawn(
        SessionId::new("s-1"),
        AgentId::new("sonnet"),
        PluginName::new("claude_cli"),
        opts,
    );
    assert!(matches!(result, Err(PtyError::ProjectPathMissing(_))));
}

#[tokio::test]
#[serial]
async fn spawn_emits_init_and_completes_with_exit_code() {
    let _fake = FakeClaude::new(
        "#!/bin/sh\necho '{\"type\":\"system\",\"subtype\":\"init\",\"session_id\":\"up-1\"}'\necho '{\"type\":\"result\",\"subtype\":\"success\",\"session_id\":\"up-1\"}'\nexit 0\n",
    );
    let project = TempDir::new().expect("tempdir");
    let clock = FakeClock::new();

    let session = PtySession::spawn_with_clock(
        SessionId::new("s-2"),
        AgentId::new("sonnet"),
        PluginName::new("claude_cli"),
        invoke_opts(project.path().to_path_buf()),
        clock,
    )
    .expect("spawn");

    let mut rx = session.subscribe();
    session.await_ready().await.expect("await_ready");

    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for first event")
        .expect("channel closed");
    assert_eq!(first.event_type, SessionEventType::Init, "first event must be init");
    assert_eq!(first.session_id, session.id);

    let complete = recv_until(&mut rx, SessionEventType::Complete).await;
    match complete.data {
        SessionEventData::Complete { exit_code, upstream_session_id } => {
            assert_eq!(exit_code, Some(0));
            assert_eq!(upstream_session_id.as_deref(), Some("up-1"));
        }
        other => panic!("unexpected complete payload: {other:?}"),
    }

    let snapshot = session.snapshot();
    assert_eq!(snapshot.status(), SessionStatus::Completed);
    assert!(session.is_terminal());
}

#[tokio::test]
#[serial]
async fn exit_without_init_fails_await_ready_promptly() {
    let _fake = FakeClaude::new("#!/bin/sh\nexit 1\n");
    let project = TempDir::new().expect("tempdir");

    let session = PtySession::spawn(
        SessionId::new("s-3"),
        AgentId::new("sonnet"),
        PluginName::new("claude_cli"),
        invoke_opts(project.path().to_path_buf()),
    )
    .expect("spawn");

    let result = tokio::time::timeout(Duration::from_secs(5), session.await_ready()).await;
    assert!(matches!(result, Ok(Err(PtyError::UpstreamInitTimeout(_)))));
}

#[tokio::test]
#[serial]
async fn stop_is_idempotent_after_natural_exit() {
    let _fake = FakeClaude::new(
        "#!/bin/sh\necho '{\"type\":\"system\",\"subtype\":\"init\",\"session_id\":\"up-4\"}'\nexit 0\n",
    );
    let project = TempDir::new().expect("tempdir");

    let session = PtySession::spawn(
        SessionId::new("s-4"),
        AgentId::new("sonnet"),
        PluginName::new("claude_cli"),
        invoke_opts(project.path().to_path_buf()),
    )
    .expect("spawn");

    session.await_ready().await.expect("await_ready");
    tokio::time::sleep(Duration::from_millis(200)).await;

    session.stop().await.expect("first stop");
    session.stop().await.expect("second stop is a no-op");
    assert!(session.is_terminal());
}

#[tokio::test]
#[serial]
async fn stop_terminates_a_long_running_process() {
    let _fake = FakeClaude::new(
        "#!/bin/sh\necho '{\"type\":\"system\",\"subtype\":\"init\",\"session_id\":\"up-5\"}'\nsleep 60\n",
    );
    let project = TempDir::new().expect("tempdir");

    let session = PtySession::spawn(
        SessionId::new("s-5"),
        AgentId::new("sonnet"),
        PluginName::new("claude_cli"),
        invoke_opts(project.path().to_path_buf()),
    )
    .expect("spawn");

    session.await_ready().await.expect("await_ready");

    let stopped = tokio::time::timeout(Duration::from_secs(8), session.stop()).await;
    assert!(stopped.is_ok(), "stop() should finish well inside the kill grace window");
    assert!(session.is_terminal());
}
