// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay.

mod items;
mod jobs;
mod printers;

use scribe_core::{
    sort_items, Event, HouseholdId, List, ListId, ListItem, PrintJob, Printer, PrinterId,
};
use std::collections::HashMap;

/// In-memory state built by applying store events in order.
///
/// # Idempotency Requirement
///
/// **All event handlers MUST be idempotent.** Applying the same event twice
/// must produce the same state as applying it once, because events are
/// applied both when committed and again during WAL replay after a restart.
///
/// Guidelines:
/// - Use assignment (`=`) instead of mutation (`+=`)
/// - Guard inserts with existence checks
/// - Deletions use `retain`/`remove`, which are naturally idempotent
#[derive(Debug, Default, Clone)]
pub struct MaterializedState {
    pub printers: HashMap<String, Printer>,
    pub jobs: HashMap<String, PrintJob>,
    pub lists: HashMap<String, List>,
    pub items: HashMap<String, ListItem>,
}

impl MaterializedState {
    /// Apply an event to derive state changes.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::PrinterRegistered { .. } | Event::PrinterSeen { .. } => {
                printers::apply(self, event)
            }

            Event::JobEnqueued { .. } | Event::JobClaimed { .. } | Event::JobAcked { .. } => {
                jobs::apply(self, event)
            }

            Event::ListCreated { .. }
            | Event::ItemAdded { .. }
            | Event::ItemChecked { .. }
            | Event::ItemDeleted { .. }
            | Event::ListCleared { .. } => items::apply(self, event),
        }
    }

    /// The household's registered printer, if any. At most one exists.
    pub fn printer_for_household(&self, household_id: &HouseholdId) -> Option<&Printer> {
        self.printers.values().find(|p| p.household_id == *household_id)
    }

    /// The oldest pending job owned by `printer_id`, by creation time
    /// ascending with job id as a deterministic tie-break.
    pub fn next_pending_for(&self, printer_id: &PrinterId) -> Option<&PrintJob> {
        self.jobs
            .values()
            .filter(|j| j.printer_id == *printer_id && j.status == scribe_core::JobStatus::Pending)
            .min_by(|a, b| {
                a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.as_str().cmp(b.id.as_str()))
            })
    }

    /// All items of a list in display order.
    pub fn items_of(&self, list_id: &ListId) -> Vec<ListItem> {
        let mut items: Vec<ListItem> =
            self.items.values().filter(|i| i.list_id == *list_id).cloned().collect();
        sort_items(&mut items);
        items
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
