// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `novad`: the Nova agent orchestration daemon binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "novad", about = "Nova agent orchestration daemon")]
struct Cli {
    /// Overrides NOVA_PORT and `server.port` in `nova.config.json`.
    #[arg(long)]
    port: Option<u16>,

    /// Overrides NOVA_BASE_PATH.
    #[arg(long)]
    base_path: Option<PathBuf>,

    /// Overrides `server.host` in `nova.config.json`. Defaults to loopback.
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let base_path = cli.base_path.unwrap_or_else(nova_daemon::env::base_path);
    let state = nova_daemon::lifecycle::boot(base_path).await;

    // Precedence: CLI flags > environment > `nova.config.json` (§2a).
    let server_config = state.config.server();
    let port = cli.port.or_else(nova_daemon::env::port_override).unwrap_or(server_config.port);
    let host = cli.host.unwrap_or(server_config.host);
    let addr: SocketAddr = format!("{host}:{port}").parse().unwrap_or_else(|e| {
        tracing::error!(error = %e, %host, "invalid bind address, falling back to loopback");
        SocketAddr::from(([127, 0, 0, 1], port))
    });

    if let Err(e) = nova_daemon::lifecycle::serve(state, addr).await {
        tracing::error!(error = %e, "server exited with an error");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_new(nova_daemon::env::log_directive()).unwrap_or_else(|_| EnvFilter::new("info"));

    let state_dir = nova_daemon::env::state_dir();
    let _ = std::fs::create_dir_all(&state_dir);
    let file_appender = tracing_appender::rolling::daily(&state_dir, "novad.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // Leaked intentionally: the guard must outlive the process, and the
    // process only ever exits via `std::process::exit` or falling off main.
    std::mem::forget(guard);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking.and(std::io::stderr))
        .init();
}
