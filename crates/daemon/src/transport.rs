// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Axum router and the `/nova` WebSocket upgrade handler (§4.7, §6).

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::connect_info::ConnectInfo;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{header, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use nova_wire::{error_codes, ErrorObject, Request as RpcRequest, RequestId, Response as RpcResponse};

use crate::state::AppState;

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    let router = Router::new()
        .route("/nova", get(nova_ws_upgrade))
        .route("/health", get(health))
        .route("/plugins", get(plugins))
        .fallback(banner)
        .with_state(state.clone())
        .layer(cors);

    if crate::env::auth_token().is_some() {
        router.layer(axum::middleware::from_fn_with_state(state, auth_gate))
    } else {
        router
    }
}

/// Loopback connections bypass auth unconditionally. Anything else must
/// present `Authorization: Bearer <NOVA_AUTH_TOKEN>`; a non-loopback bind
/// with no configured token rejects every remote request (§6).
async fn auth_gate(
    State(_state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    if addr.ip().is_loopback() {
        return next.run(req).await;
    }

    let Some(expected) = crate::env::auth_token() else {
        return (StatusCode::UNAUTHORIZED, "authentication not configured").into_response();
    };

    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => next.run(req).await,
        _ => (StatusCode::UNAUTHORIZED, "invalid or missing bearer token").into_response(),
    }
}

async fn nova_ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed);
    state.connection_opened();
    debug!(conn_id, "websocket connection opened");

    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if ws_sender.send(message).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = ws_receiver.next().await {
        match message {
            Message::Text(text) => {
                let request: RpcRequest = match serde_json::from_str(&text) {
                    Ok(request) => request,
                    Err(e) => {
                        warn!(conn_id, error = %e, "malformed json-rpc frame");
                        let error = ErrorObject::new(error_codes::PARSE_ERROR, format!("Parse error: {e}"));
                        let response = RpcResponse::failure(RequestId::Null, error);
                        let _ = tx.send(Message::Text(serde_json::to_string(&response).unwrap_or_default().into()));
                        continue;
                    }
                };
                if let Some(response) = crate::rpc::dispatch(&state, conn_id, &tx, request).await {
                    let text = serde_json::to_string(&response).unwrap_or_default();
                    let _ = tx.send(Message::Text(text.into()));
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    send_task.abort();
    state.subscriptions.disconnect(conn_id);
    state.connection_closed();
    debug!(conn_id, "websocket connection closed");
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    plugins: usize,
    sessions: usize,
    connections: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "ok",
        plugins: state.registry.plugins().len(),
        sessions: state.registry.get_sessions().len(),
        connections: state.connection_count(),
    })
}

async fn plugins(State(state): State<Arc<AppState>>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "plugins": state.registry.plugins() }))
}

async fn banner() -> impl IntoResponse {
    (StatusCode::OK, "nova-daemon\n")
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
