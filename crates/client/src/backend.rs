// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend access trait and its socket implementation.
//!
//! The trait is the seam between client logic and transport: replay,
//! reconciliation, and the producer all run against [`Backend`], so tests
//! drive them with in-memory fakes and production wires them to the
//! daemon socket.

use std::path::PathBuf;

use async_trait::async_trait;
use scribe_core::{
    HouseholdId, JobDraft, JobId, List, ListId, ListItem, MemberId, Printer, QueuedAction,
};
use scribe_wire::{ErrorKind, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// The backend received the request and said no. Retrying the same
    /// request will not succeed.
    #[error("backend rejected request ({kind}): {message}")]
    Rejected { kind: ErrorKind, message: String },

    /// The backend could not be reached. The request may be retried.
    #[error("backend unreachable: {0}")]
    Unreachable(String),
}

impl From<ProtocolError> for BackendError {
    fn from(e: ProtocolError) -> Self {
        BackendError::Unreachable(e.to_string())
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn apply(&self, member_id: MemberId, action: QueuedAction) -> Result<(), BackendError>;

    async fn create_list(
        &self,
        member_id: MemberId,
        household_id: HouseholdId,
        name: &str,
    ) -> Result<List, BackendError>;

    async fn create_job(&self, draft: JobDraft) -> Result<JobId, BackendError>;

    async fn fetch_items(&self, list_id: &ListId) -> Result<Vec<ListItem>, BackendError>;

    async fn printer_for(&self, household_id: &HouseholdId)
        -> Result<Option<Printer>, BackendError>;
}

/// Backend over the daemon's Unix socket, one connection per call.
///
/// Connect-per-call keeps the client free of connection state; a dead
/// daemon shows up as `Unreachable` on the next call rather than as a
/// broken long-lived stream.
pub struct RemoteBackend {
    socket: PathBuf,
}

impl RemoteBackend {
    pub fn new(socket: impl Into<PathBuf>) -> Self {
        Self { socket: socket.into() }
    }

    async fn call(&self, request: Request) -> Result<Response, BackendError> {
        let mut stream = UnixStream::connect(&self.socket)
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        scribe_wire::write_request(&mut stream, &request).await?;
        match scribe_wire::read_response(&mut stream).await? {
            Response::Error { kind, message } => Err(BackendError::Rejected { kind, message }),
            response => Ok(response),
        }
    }

    fn unexpected(response: Response) -> BackendError {
        BackendError::Unreachable(format!("unexpected response: {response:?}"))
    }
}

#[async_trait]
impl Backend for RemoteBackend {
    async fn apply(&self, member_id: MemberId, action: QueuedAction) -> Result<(), BackendError> {
        match self.call(Request::Apply { member_id, action }).await? {
            Response::Ok | Response::ListCreated { .. } => Ok(()),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn create_list(
        &self,
        member_id: MemberId,
        household_id: HouseholdId,
        name: &str,
    ) -> Result<List, BackendError> {
        let action = QueuedAction::AddList {
            household_id,
            name: name.to_string(),
            temp_id: ListId::new(),
        };
        match self.call(Request::Apply { member_id, action }).await? {
            Response::ListCreated { list } => Ok(*list),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn create_job(&self, draft: JobDraft) -> Result<JobId, BackendError> {
        match self.call(Request::CreateJob { draft }).await? {
            Response::JobCreated { id } => Ok(id),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn fetch_items(&self, list_id: &ListId) -> Result<Vec<ListItem>, BackendError> {
        match self.call(Request::FetchItems { list_id: list_id.clone() }).await? {
            Response::Items { items } => Ok(items),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn printer_for(
        &self,
        household_id: &HouseholdId,
    ) -> Result<Option<Printer>, BackendError> {
        match self.call(Request::GetPrinter { household_id: household_id.clone() }).await? {
            Response::Printer { printer } => Ok(printer.map(|p| *p)),
            other => Err(Self::unexpected(other)),
        }
    }
}
