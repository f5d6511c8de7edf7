// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! scribed: the household print dispatch daemon.

use std::sync::Arc;

use scribe_core::SystemClock;
use scribe_server::{ListenCtx, Listener, ServerConfig, PROTOCOL_VERSION};
use scribe_storage::JobStore;
use tokio::net::{TcpListener, UnixListener};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

fn main() {
    let exit_code = match run() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("scribed: {e}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::load()?;
    std::fs::create_dir_all(&config.state_dir)?;

    // Daily-rotated daemon log next to the WAL; RUST_LOG filters both layers
    let file_appender = tracing_appender::rolling::daily(config.state_dir.join("logs"), "scribed.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(file_writer)
        .with_ansi(false)
        .init();

    info!(version = PROTOCOL_VERSION, "scribed starting");

    let store = JobStore::open(&config.state_dir, SystemClock)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config, store))
}

async fn serve(
    config: ServerConfig,
    store: JobStore<SystemClock>,
) -> Result<(), Box<dyn std::error::Error>> {
    // A stale socket file from an unclean shutdown blocks bind; the state
    // dir lock already guarantees no live daemon owns it
    if config.socket.exists() {
        std::fs::remove_file(&config.socket)?;
    }
    let unix = UnixListener::bind(&config.socket)?;
    info!(socket = %config.socket.display(), "listening");

    let ctx = Arc::new(ListenCtx {
        store: Arc::new(store),
        shutdown: CancellationToken::new(),
    });

    let listener = match &config.tcp {
        Some(addr) => {
            let tcp = TcpListener::bind(addr).await?;
            info!(%addr, "tcp listener enabled");
            Listener::with_tcp(unix, tcp, Arc::clone(&ctx))
        }
        None => Listener::new(unix, Arc::clone(&ctx)),
    };
    let listener_task = tokio::spawn(listener.run());

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => error!("signal handler failed: {e}"),
    }
    ctx.shutdown.cancel();
    let _ = listener_task.await;

    let _ = std::fs::remove_file(&config.socket);
    info!("scribed stopped");
    Ok(())
}
