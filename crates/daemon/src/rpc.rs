// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC 2.0 method dispatch (§4.7). One call per inbound WebSocket
//! text frame; `dispatch` never panics and always produces either a
//! `Response` (paired with the request's `id`) or `None` for a
//! notification, honoring §8 P9.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use axum::extract::ws::Message;

use nova_core::{AgentId, InvokeOptions, PluginName, SessionId, SessionStatus};
use nova_wire::{AgentInvokeParams, ProjectSessionsParams, Request, Response, SessionDeleteBulkParams, SessionDeleteParams, SessionHistoryParams, SessionIdParams, SessionMessageParams};

use crate::error::DaemonError;
use crate::state::AppState;

/// Requests are not cancellable; a server-side deadline surfaces as
/// `-32603` with a timeout message if a handler runs past it (§5).
const REQUEST_DEADLINE: Duration = Duration::from_secs(30);

pub async fn dispatch(
    state: &AppState,
    conn_id: u64,
    tx: &UnboundedSender<Message>,
    request: Request,
) -> Option<Response> {
    let id = request.id.clone();

    let outcome = match tokio::time::timeout(REQUEST_DEADLINE, handle(state, conn_id, tx, &request)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(DaemonError::Timeout),
    };

    let id = id?;
    Some(match outcome {
        Ok(result) => Response::success(id, result),
        Err(e) => Response::failure(id, e.to_error_object()),
    })
}

async fn handle(
    state: &AppState,
    conn_id: u64,
    tx: &UnboundedSender<Message>,
    request: &Request,
) -> Result<Value, DaemonError> {
    match request.method.as_str() {
        "plugin.list" => plugin_list(state),
        "agent.list" => agent_list(state),
        "agent.invoke" => agent_invoke(state, conn_id, tx, &request.params).await,
        "session.message" => session_message(state, &request.params).await,
        "session.stop" => session_stop(state, &request.params).await,
        "session.list" => session_list(state),
        "session.get" => session_get(state, &request.params),
        "session.subscribe" => session_subscribe(state, conn_id, tx, &request.params),
        "session.unsubscribe" => session_unsubscribe(state, conn_id, &request.params),
        "project.list" => project_list(state).await,
        "project.sessions" => project_sessions(state, &request.params).await,
        "session.history" => session_history(state, &request.params).await,
        "session.delete" => session_delete(state, &request.params).await,
        "session.deleteBulk" => session_delete_bulk(state, &request.params).await,
        "system.homeDirectory" => system_home_directory(),
        other => Err(DaemonError::MethodNotFound(other.to_string())),
    }
}

fn params_of<T: serde::de::DeserializeOwned>(raw: &Value) -> Result<T, DaemonError> {
    serde_json::from_value(raw.clone()).map_err(DaemonError::InvalidParams)
}

fn to_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn plugin_list(state: &AppState) -> Result<Value, DaemonError> {
    Ok(to_value(serde_json::json!({ "plugins": state.registry.plugins() })))
}

fn agent_list(state: &AppState) -> Result<Value, DaemonError> {
    Ok(to_value(serde_json::json!({ "agents": state.registry.agents() })))
}

#[derive(Serialize)]
struct InvokeResult {
    session_id: SessionId,
    upstream_session_id: Option<String>,
    status: SessionStatus,
    agent_id: AgentId,
    plugin_id: PluginName,
}

async fn agent_invoke(
    state: &AppState,
    conn_id: u64,
    tx: &UnboundedSender<Message>,
    raw: &Value,
) -> Result<Value, DaemonError> {
    let params: AgentInvokeParams = params_of(raw)?;
    let agent_id = AgentId::new(params.agent);
    let opts = InvokeOptions {
        prompt: params.prompt,
        project_path: params.project_path,
        resume_session_id: params.resume_session_id,
        fork_session: params.fork_session,
        permission_mode: params.permission_mode,
        verbose: params.verbose,
        allowed_tools: params.allowed_tools,
        disallowed_tools: params.disallowed_tools,
    };

    let session = state.registry.invoke(&params.plugin, &agent_id, opts).await?;

    // Auto-subscribe synchronously, before the reply is composed, so the
    // invoking socket's first `session.event` can never race ahead of its
    // `agent.invoke` response (§5 ordering guarantee 4).
    state.subscriptions.subscribe(&state.registry, &session.id, conn_id, tx.clone());

    let status = session.status();
    Ok(to_value(InvokeResult {
        session_id: session.id,
        upstream_session_id: session.upstream_session_id,
        status,
        agent_id: session.agent_id,
        plugin_id: session.plugin_id,
    }))
}

async fn session_message(state: &AppState, raw: &Value) -> Result<Value, DaemonError> {
    let params: SessionMessageParams = params_of(raw)?;
    let session_id = SessionId::new(params.session_id);
    match state.registry.message(&session_id, &params.message).await {
        Ok(()) => Ok(to_value(serde_json::json!({ "success": true }))),
        Err(e) => Ok(to_value(serde_json::json!({ "success": false, "error": e.to_string() }))),
    }
}

async fn session_stop(state: &AppState, raw: &Value) -> Result<Value, DaemonError> {
    let params: SessionIdParams = params_of(raw)?;
    state.registry.stop(&SessionId::new(params.session_id)).await?;
    Ok(to_value(serde_json::json!({ "success": true })))
}

fn session_list(state: &AppState) -> Result<Value, DaemonError> {
    Ok(to_value(serde_json::json!({ "sessions": state.registry.get_sessions() })))
}

fn session_get(state: &AppState, raw: &Value) -> Result<Value, DaemonError> {
    let params: SessionIdParams = params_of(raw)?;
    let session_id = SessionId::new(params.session_id);
    let session = state
        .registry
        .get_session(&session_id)
        .ok_or_else(|| DaemonError::Plugin(nova_plugins::PluginError::SessionNotFound(session_id)))?;
    Ok(to_value(serde_json::json!({ "session": session })))
}

fn session_subscribe(
    state: &AppState,
    conn_id: u64,
    tx: &UnboundedSender<Message>,
    raw: &Value,
) -> Result<Value, DaemonError> {
    let params: SessionIdParams = params_of(raw)?;
    let session_id = SessionId::new(params.session_id);
    if !state.subscriptions.subscribe(&state.registry, &session_id, conn_id, tx.clone()) {
        return Err(DaemonError::Plugin(nova_plugins::PluginError::SessionNotFound(session_id)));
    }
    Ok(to_value(serde_json::json!({ "subscribed": true, "session_id": session_id })))
}

fn session_unsubscribe(state: &AppState, conn_id: u64, raw: &Value) -> Result<Value, DaemonError> {
    let params: SessionIdParams = params_of(raw)?;
    let session_id = SessionId::new(params.session_id);
    state.subscriptions.unsubscribe(&session_id, conn_id);
    Ok(to_value(serde_json::json!({ "unsubscribed": true, "session_id": session_id })))
}

async fn project_list(state: &AppState) -> Result<Value, DaemonError> {
    let projects = state.history.list_projects().await?;
    Ok(to_value(serde_json::json!({ "projects": projects })))
}

async fn project_sessions(state: &AppState, raw: &Value) -> Result<Value, DaemonError> {
    let params: ProjectSessionsParams = params_of(raw)?;
    let sessions = state.history.project_sessions(&params.project_id).await?;
    Ok(to_value(serde_json::json!({ "sessions": sessions })))
}

async fn session_history(state: &AppState, raw: &Value) -> Result<Value, DaemonError> {
    let params: SessionHistoryParams = params_of(raw)?;
    let records = state.history.load_history(&params.project_id, &params.session_id).await?;
    Ok(to_value(serde_json::json!({ "records": records })))
}

async fn session_delete(state: &AppState, raw: &Value) -> Result<Value, DaemonError> {
    let params: SessionDeleteParams = params_of(raw)?;
    state.history.delete_session(&params.project_id, &params.session_id).await?;
    Ok(to_value(serde_json::json!({ "success": true })))
}

async fn session_delete_bulk(state: &AppState, raw: &Value) -> Result<Value, DaemonError> {
    let params: SessionDeleteBulkParams = params_of(raw)?;
    let result = state.history.delete_bulk(&params.project_id, params.session_ids).await;
    Ok(to_value(result))
}

fn system_home_directory() -> Result<Value, DaemonError> {
    let home = nova_history::HistoryService::home_directory();
    Ok(to_value(serde_json::json!({ "home_directory": home })))
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod tests;
