// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use scribe_core::{JobId, List, ListItem, PrintJob, Printer, RowChange};
use serde::{Deserialize, Serialize};

use super::JobTicket;

/// Response from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success
    Ok,

    /// Version handshake response
    Hello { version: String },

    /// Next job for a polling printer, if any
    Job { job: Option<Box<JobTicket>> },

    /// Job accepted into the queue
    JobCreated { id: JobId },

    /// Full job record
    JobDetail { job: Option<Box<PrintJob>> },

    /// Registered printer for a household, if any
    Printer { printer: Option<Box<Printer>> },

    /// Freshly registered printer, api key included
    PrinterRegistered { printer: Box<Printer> },

    /// Freshly created list; the client maps its temp id to the real one
    ListCreated { list: Box<List> },

    /// Items of a list in display order
    Items { items: Vec<ListItem> },

    /// Change-feed stream established; `Change` frames follow
    Subscribed,

    /// One change-feed notification
    Change { change: RowChange },

    /// Error response
    Error { kind: ErrorKind, message: String },
}

/// Coarse error classification carried over the wire.
///
/// Clients branch on the kind; the message is for humans.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    Validation,
    NotFound,
    Conflict,
    Internal,
}

scribe_core::simple_display! {
    ErrorKind {
        Auth => "auth",
        Validation => "validation",
        NotFound => "not_found",
        Conflict => "conflict",
        Internal => "internal",
    }
}
