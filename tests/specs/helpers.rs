// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process daemon harness for the integration tests.

use std::path::PathBuf;
use std::sync::{Arc, Weak};

use scribe_core::SystemClock;
use scribe_server::{ListenCtx, Listener};
use scribe_storage::JobStore;
use scribe_wire::{Request, Response};
use tempfile::TempDir;
use tokio::net::{UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;

pub struct TestDaemon {
    pub socket: PathBuf,
    shutdown: CancellationToken,
    listener: Option<tokio::task::JoinHandle<()>>,
    ctx: Weak<ListenCtx>,
    _dir: Option<TempDir>,
}

impl TestDaemon {
    /// Start a daemon on a fresh state dir and Unix socket.
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let socket = dir.path().join("scribed.sock");
        let state_dir = dir.path().join("state");
        let mut daemon = Self::start_at(&socket, &state_dir).await;
        daemon._dir = Some(dir);
        daemon
    }

    /// Start at explicit paths so a test can stop and restart the daemon
    /// against the same durable state.
    pub async fn start_at(socket: &std::path::Path, state_dir: &std::path::Path) -> Self {
        let store = JobStore::open(state_dir, SystemClock).expect("store open");
        if socket.exists() {
            std::fs::remove_file(socket).expect("remove stale socket");
        }
        let unix = UnixListener::bind(socket).expect("bind socket");

        let shutdown = CancellationToken::new();
        let ctx = Arc::new(ListenCtx {
            store: Arc::new(store),
            shutdown: shutdown.clone(),
        });
        let weak = Arc::downgrade(&ctx);
        let listener = tokio::spawn(Listener::new(unix, ctx).run());

        Self {
            socket: socket.to_path_buf(),
            shutdown,
            listener: Some(listener),
            ctx: weak,
            _dir: None,
        }
    }

    /// Stop the daemon, releasing the state dir lock before returning.
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(listener) = self.listener.take() {
            let _ = listener.await;
        }
        // Connection tasks hold their own handles to the daemon context;
        // wait for the last one to drop it so the state dir lock is free.
        while self.ctx.upgrade().is_some() {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
    }

    /// One request/response exchange over a fresh connection.
    pub async fn call(&self, request: Request) -> Response {
        let mut stream = UnixStream::connect(&self.socket).await.expect("connect");
        scribe_wire::write_request(&mut stream, &request).await.expect("write request");
        scribe_wire::read_response(&mut stream).await.expect("read response")
    }

    /// Open a raw connection for multi-frame exchanges (subscriptions).
    pub async fn connect(&self) -> UnixStream {
        UnixStream::connect(&self.socket).await.expect("connect")
    }
}

impl Drop for TestDaemon {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
