// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn agent_invoke_params_parse_camel_case_and_default_optionals() {
    let raw = r#"{
        "plugin": "claude_cli",
        "agent": "sonnet",
        "projectPath": "/tmp/x",
        "prompt": "hello"
    }"#;
    let params: AgentInvokeParams = serde_json::from_str(raw).expect("parse");
    assert_eq!(params.plugin, "claude_cli");
    assert_eq!(params.project_path, PathBuf::from("/tmp/x"));
    assert!(!params.fork_session);
    assert!(params.resume_session_id.is_none());
    assert_eq!(params.permission_mode, PermissionMode::BypassPermissions);
}

#[test]
fn session_message_params_require_both_fields() {
    let raw = r#"{"sessionId":"s-1","message":"hi"}"#;
    let params: SessionMessageParams = serde_json::from_str(raw).expect("parse");
    assert_eq!(params.session_id, "s-1");
    assert_eq!(params.message, "hi");
}

#[test]
fn session_delete_bulk_params_parse_id_list() {
    let raw = r#"{"projectId":"-tmp-x","sessionIds":["a","b"]}"#;
    let params: SessionDeleteBulkParams = serde_json::from_str(raw).expect("parse");
    assert_eq!(params.project_id, "-tmp-x");
    assert_eq!(params.session_ids, vec!["a".to_string(), "b".to_string()]);
}
