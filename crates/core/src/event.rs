// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store events and change-feed notifications.
//!
//! [`Event`] is the WAL record: facts about what happened, replayed at
//! startup to rebuild state. [`RowChange`] is the row-level notification
//! pushed to subscribed clients so they know when to refetch.

use crate::id::HouseholdId;
use crate::job::{AckStatus, JobId, PrintJob};
use crate::list::{ItemId, List, ListId, ListItem};
use crate::printer::{Printer, PrinterId};
use serde::{Deserialize, Serialize};

/// Durable store event. State is derived from these by replay, so every
/// handler that applies one must be idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PrinterRegistered { printer: Printer },
    PrinterSeen { id: PrinterId, at_ms: u64 },
    JobEnqueued { job: PrintJob },
    JobClaimed { id: JobId },
    JobAcked { id: JobId, status: AckStatus, printed_at_ms: u64 },
    ListCreated { list: List },
    ItemAdded { item: ListItem },
    ItemChecked { id: ItemId, checked: bool },
    ItemDeleted { id: ItemId },
    /// Cascade delete of all items when a clear-after-print job completes.
    ListCleared { list_id: ListId },
}

/// Backend table a change happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Printers,
    PrintJobs,
    Lists,
    ListItems,
}

crate::simple_display! {
    Table {
        Printers => "printers",
        PrintJobs => "print_jobs",
        Lists => "lists",
        ListItems => "list_items",
    }
}

/// Kind of row mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

crate::simple_display! {
    ChangeOp {
        Insert => "insert",
        Update => "update",
        Delete => "delete",
    }
}

/// Row-level change notification delivered over the change feed.
///
/// Carries no row data on purpose: clients respond by refetching the
/// affected collection, not by merging the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowChange {
    pub table: Table,
    pub op: ChangeOp,
    pub household_id: HouseholdId,
    /// Set for `list_items` changes so watchers of one list can filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
}
