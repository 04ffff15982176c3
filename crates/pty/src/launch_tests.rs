// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nova_core::PermissionMode;

fn opts(prompt: &str) -> InvokeOptions {
    InvokeOptions {
        prompt: prompt.to_string(),
        project_path: PathBuf::from("/tmp/project"),
        resume_session_id: None,
        fork_session: false,
        permission_mode: PermissionMode::default(),
        verbose: false,
        allowed_tools: vec![],
        disallowed_tools: vec![],
    }
}

#[test]
fn builds_minimal_args() {
    let args = build_args(&AgentId::new("sonnet"), &opts("hello"));
    assert_eq!(
        args,
        vec![
            "-p",
            "hello",
            "--output-format",
            "stream-json",
            "--include-partial-messages",
            "--model",
            "sonnet",
            "--permission-mode",
            "bypassPermissions",
        ]
    );
}

#[test]
fn resume_without_fork_omits_fork_flag() {
    let mut o = opts("again");
    o.resume_session_id = Some("U-1".into());
    let args = build_args(&AgentId::new("opus"), &o);
    assert!(args.contains(&"--resume".to_string()));
    assert!(args.contains(&"U-1".to_string()));
    assert!(!args.contains(&"--fork-session".to_string()));
}

#[test]
fn resume_with_fork_adds_fork_flag() {
    let mut o = opts("again");
    o.resume_session_id = Some("U-1".into());
    o.fork_session = true;
    let args = build_args(&AgentId::new("opus"), &o);
    assert!(args.contains(&"--fork-session".to_string()));
}

#[test]
fn allow_and_deny_lists_are_comma_joined() {
    let mut o = opts("hi");
    o.allowed_tools = vec!["Bash".into(), "Read".into()];
    o.disallowed_tools = vec!["WebFetch".into()];
    let args = build_args(&AgentId::new("sonnet"), &o);
    let allow_idx = args.iter().position(|a| a == "--allowedTools").unwrap();
    assert_eq!(args[allow_idx + 1], "Bash,Read");
    let deny_idx = args.iter().position(|a| a == "--disallowedTools").unwrap();
    assert_eq!(args[deny_idx + 1], "WebFetch");
}

#[test]
fn legacy_bypass_mode_false_maps_to_default_flag() {
    let mut o = opts("hi");
    o.permission_mode = PermissionMode::from_legacy_bypass_mode(false);
    let args = build_args(&AgentId::new("sonnet"), &o);
    let idx = args.iter().position(|a| a == "--permission-mode").unwrap();
    assert_eq!(args[idx + 1], "default");
}
