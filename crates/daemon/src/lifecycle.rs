// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup ordering and signal handling (§4.8, C9).

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use nova_config::ConfigLoader;
use nova_history::HistoryService;
use nova_plugins::{PluginLoader, PluginRegistry};

use crate::state::AppState;

/// Builds every component in the order the design calls for: config,
/// registry, loader (wired to both), then runs discovery before the
/// caller binds a listener.
pub async fn boot(base_path: std::path::PathBuf) -> Arc<AppState> {
    let config = Arc::new(ConfigLoader::load(base_path.join("nova.config.json")));
    let registry = Arc::new(PluginRegistry::new());
    let loader = PluginLoader::new(base_path.join("plugins"), config.clone());

    let transcript_root = nova_history::default_transcript_root().unwrap_or_else(|| base_path.join("projects"));
    let history = HistoryService::new(transcript_root);

    loader.discover(&registry).await;

    Arc::new(AppState::new(config, registry, loader, history))
}

/// Binds the listener and serves until SIGINT/SIGTERM, then runs the
/// shutdown sequence: stop accepting connections, drop subscriptions,
/// shut every plugin down, and return for the caller to exit(0).
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let router = crate::transport::build_router(state.clone()).into_make_service_with_connect_info::<SocketAddr>();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "nova-daemon listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down");
    state.registry.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install SIGINT handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
