// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! The listener accepts connections on the Unix socket (and optionally
//! TCP for off-host printers) and spawns a task per connection. Each
//! connection is a request/response loop over the length-prefixed wire
//! protocol until the client hangs up, except `Subscribe`, which turns
//! the connection into a one-way change-feed stream.

mod dispatch;
mod mutations;
mod query;
mod subscribe;

use std::sync::Arc;

use scribe_core::SystemClock;
use scribe_storage::{JobStore, StoreError};
use scribe_wire::{ErrorKind, ProtocolError, Request, Response};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, UnixListener};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Protocol version (from Cargo.toml)
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared daemon context for all request handlers.
pub struct ListenCtx {
    pub store: Arc<JobStore<SystemClock>>,
    pub shutdown: CancellationToken,
}

/// Listener task for accepting socket connections.
pub struct Listener {
    unix: UnixListener,
    tcp: Option<TcpListener>,
    ctx: Arc<ListenCtx>,
}

impl Listener {
    /// Create a new listener with Unix socket only.
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, tcp: None, ctx }
    }

    /// Create a new listener with both Unix socket and TCP.
    pub fn with_tcp(unix: UnixListener, tcp: TcpListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, tcp: Some(tcp), ctx }
    }

    /// Run the accept loop until shutdown.
    pub async fn run(self) {
        let shutdown = self.ctx.shutdown.clone();
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("listener shutting down");
                    return;
                }
                result = self.unix.accept() => {
                    match result {
                        Ok((stream, _)) => self.spawn_connection(stream),
                        Err(e) => error!("unix accept error: {e}"),
                    }
                }
                result = accept_tcp(self.tcp.as_ref()) => {
                    match result {
                        Ok((stream, addr)) => {
                            debug!("tcp connection from {addr}");
                            self.spawn_connection(stream);
                        }
                        Err(e) => error!("tcp accept error: {e}"),
                    }
                }
            }
        }
    }

    fn spawn_connection<S>(&self, stream: S)
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let ctx = Arc::clone(&self.ctx);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, &ctx).await {
                log_connection_error(e);
            }
        });
    }
}

/// Accept on the TCP listener when one is configured; pend forever otherwise
/// so the select arm never fires.
async fn accept_tcp(
    tcp: Option<&TcpListener>,
) -> std::io::Result<(tokio::net::TcpStream, std::net::SocketAddr)> {
    match tcp {
        Some(listener) => listener.accept().await,
        None => std::future::pending().await,
    }
}

fn log_connection_error(e: ProtocolError) {
    match e {
        ProtocolError::ConnectionClosed => debug!("client disconnected"),
        _ => error!("connection error: {e}"),
    }
}

/// Handle a single client connection: a request/response loop until the
/// client disconnects or upgrades to a change-feed stream.
async fn handle_connection<S>(mut stream: S, ctx: &ListenCtx) -> Result<(), ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let request = match scribe_wire::read_request(&mut stream).await {
            Ok(request) => request,
            Err(ProtocolError::ConnectionClosed) => return Ok(()),
            Err(e) => return Err(e),
        };
        debug!(request = ?request, "received request");

        // Subscribe upgrades the connection: after the handshake the daemon
        // only writes Change frames. Handle it before normal dispatch.
        if let Request::Subscribe { household_id, list_id } = request {
            return subscribe::stream_changes(
                &mut stream,
                &ctx.store,
                &ctx.shutdown,
                household_id,
                list_id,
            )
            .await;
        }

        let response = handle_request(request, ctx);
        scribe_wire::write_response(&mut stream, &response).await?;
    }
}

fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    match request {
        Request::Hello { version: _ } => {
            Response::Hello { version: PROTOCOL_VERSION.to_string() }
        }

        Request::Poll { printer_id, api_key } => {
            dispatch::handle_poll(&ctx.store, &printer_id, &api_key)
        }

        Request::Ack { job_id, api_key, status } => {
            dispatch::handle_ack(&ctx.store, &job_id, &api_key, &status)
        }

        Request::RegisterPrinter { household_id, name } => {
            mutations::handle_register_printer(&ctx.store, household_id, &name)
        }

        Request::GetPrinter { household_id } => {
            query::handle_get_printer(&ctx.store, &household_id)
        }

        Request::CreateJob { draft } => mutations::handle_create_job(&ctx.store, draft),

        Request::Apply { member_id, action } => {
            mutations::handle_apply(&ctx.store, member_id, action)
        }

        Request::FetchItems { list_id } => query::handle_fetch_items(&ctx.store, &list_id),

        Request::GetJob { id } => query::handle_get_job(&ctx.store, &id),

        // Intercepted in handle_connection before reaching handle_request
        Request::Subscribe { .. } => unreachable!(),
    }
}

/// Map store failures onto wire error kinds.
fn store_error(e: StoreError) -> Response {
    let (kind, message) = match &e {
        StoreError::Auth => (ErrorKind::Auth, e.to_string()),
        StoreError::Validation(_) => (ErrorKind::Validation, e.to_string()),
        StoreError::NotFound(_) => (ErrorKind::NotFound, e.to_string()),
        StoreError::Conflict(_) => (ErrorKind::Conflict, e.to_string()),
        StoreError::Locked | StoreError::Wal(_) | StoreError::Io(_) => {
            error!("store failure: {e}");
            (ErrorKind::Internal, "internal storage error".to_string())
        }
    };
    Response::Error { kind, message }
}

#[cfg(test)]
fn test_store() -> (Arc<JobStore<scribe_core::FakeClock>>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::open(dir.path(), scribe_core::FakeClock::default()).unwrap();
    (Arc::new(store), dir)
}
