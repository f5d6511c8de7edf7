// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The backend job store.
//!
//! All operations run under one mutex over the materialized state, so the
//! claim's select-and-transition is a single race-free step: two concurrent
//! polls with the same printer credentials can never both receive the same
//! job. Mutations append to the WAL before applying, and fan out row-level
//! change notifications to subscribers.

use std::fs::{File, OpenOptions};
use std::path::Path;

use fs2::FileExt;
use parking_lot::Mutex;
use scribe_core::{
    AckStatus, ApiKey, ChangeOp, Clock, Event, HouseholdId, ItemId, JobDraft, JobId, List, ListId,
    ListItem, MemberId, PrintJob, Printer, PrinterId, RowChange, Table,
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};

const WAL_FILE: &str = "store.wal";
const LOCK_FILE: &str = "store.lock";

/// Buffered change notifications per subscriber before lagging.
const CHANGE_FEED_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Credential mismatch on claim/ack. Deliberately carries no detail:
    /// the caller learns nothing about which part of the credential failed.
    #[error("invalid credentials")]
    Auth,

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("state directory is already in use by another process")]
    Locked,

    #[error(transparent)]
    Wal(#[from] WalError),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

struct Inner {
    state: MaterializedState,
    wal: Wal,
}

/// Durable record of print jobs, printers, and lists.
pub struct JobStore<C: Clock> {
    clock: C,
    inner: Mutex<Inner>,
    changes: broadcast::Sender<RowChange>,
    /// Advisory lock on the state directory, held for the store's lifetime.
    _lock: File,
}

impl<C: Clock> JobStore<C> {
    /// Open the store in `state_dir`, replaying the WAL to rebuild state.
    pub fn open(state_dir: &Path, clock: C) -> Result<Self, StoreError> {
        std::fs::create_dir_all(state_dir)?;

        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .open(state_dir.join(LOCK_FILE))?;
        lock.try_lock_exclusive().map_err(|_| StoreError::Locked)?;

        let (wal, events) = Wal::open(&state_dir.join(WAL_FILE))?;
        let mut state = MaterializedState::default();
        for event in &events {
            state.apply_event(event);
        }
        info!(
            events = events.len(),
            jobs = state.jobs.len(),
            printers = state.printers.len(),
            "store opened"
        );

        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Ok(Self { clock, inner: Mutex::new(Inner { state, wal }), changes, _lock: lock })
    }

    /// Subscribe to row-level change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<RowChange> {
        self.changes.subscribe()
    }

    /// Append events, apply them to state, then notify subscribers.
    /// Everything happens under the caller's lock, so state and the WAL
    /// never disagree about commit order.
    fn commit(
        &self,
        inner: &mut Inner,
        events: &[Event],
        changes: Vec<RowChange>,
    ) -> Result<(), StoreError> {
        inner.wal.append_batch(events)?;
        for event in events {
            inner.state.apply_event(event);
        }
        for change in changes {
            // No receivers is fine; the feed is best-effort
            let _ = self.changes.send(change);
        }
        Ok(())
    }

    // ── Producer path ─────────────────────────────────────────────────────

    /// Insert a new pending job. No cross-check that `printer_id` belongs
    /// to `household_id` happens at this layer.
    pub fn enqueue(&self, draft: JobDraft) -> Result<JobId, StoreError> {
        let job = PrintJob::new(draft, self.clock.epoch_ms());
        let id = job.id.clone();
        let change = RowChange {
            table: Table::PrintJobs,
            op: ChangeOp::Insert,
            household_id: job.household_id.clone(),
            list_id: None,
        };
        let mut inner = self.inner.lock();
        self.commit(&mut inner, &[Event::JobEnqueued { job }], vec![change])?;
        debug!(job_id = %id, "job enqueued");
        Ok(id)
    }

    // ── Dispatch protocol ─────────────────────────────────────────────────

    /// Authenticate the printer, stamp `last_seen`, and atomically claim the
    /// oldest pending job, if any. Returns the job's immutable snapshot.
    pub fn claim_next(
        &self,
        printer_id: &PrinterId,
        api_key: &ApiKey,
    ) -> Result<Option<PrintJob>, StoreError> {
        let mut inner = self.inner.lock();

        let printer = match inner.state.printers.get(printer_id.as_str()) {
            Some(p) if p.authenticate(api_key) => p,
            _ => return Err(StoreError::Auth),
        };
        let household_id = printer.household_id.clone();
        let now = self.clock.epoch_ms();

        // last_seen updates even when no job is available
        let mut events = vec![Event::PrinterSeen { id: printer_id.clone(), at_ms: now }];
        let mut changes = vec![RowChange {
            table: Table::Printers,
            op: ChangeOp::Update,
            household_id: household_id.clone(),
            list_id: None,
        }];

        let claimed_id = inner.state.next_pending_for(printer_id).map(|j| j.id.clone());
        if let Some(id) = &claimed_id {
            events.push(Event::JobClaimed { id: id.clone() });
            changes.push(RowChange {
                table: Table::PrintJobs,
                op: ChangeOp::Update,
                household_id,
                list_id: None,
            });
        }

        self.commit(&mut inner, &events, changes)?;

        Ok(claimed_id.and_then(|id| {
            debug!(job_id = %id, printer_id = %printer_id, "job claimed");
            inner.state.jobs.get(id.as_str()).cloned()
        }))
    }

    /// Record the consumer's terminal status for a claimed job.
    ///
    /// The key is validated against the printer that owns the job, derived
    /// from the job record itself rather than the caller's claimed identity.
    /// On `done` with `clear_after_print`, the cascade delete of the list's
    /// items commits in the same WAL batch as the status flip.
    pub fn ack(
        &self,
        job_id: &JobId,
        api_key: &ApiKey,
        status: AckStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();

        let job = inner
            .state
            .jobs
            .get(job_id.as_str())
            .ok_or_else(|| StoreError::NotFound(format!("job {job_id}")))?;

        match inner.state.printers.get(job.printer_id.as_str()) {
            Some(p) if p.authenticate(api_key) => {}
            _ => return Err(StoreError::Auth),
        }

        // Probe the transition before committing anything
        let mut probe = job.clone();
        let now = self.clock.epoch_ms();
        probe.ack(status, now).map_err(|e| StoreError::Conflict(e.to_string()))?;

        let household_id = job.household_id.clone();
        let clear_list = (status == AckStatus::Done && job.clear_after_print)
            .then(|| job.list_id.clone())
            .flatten();

        let mut events = vec![Event::JobAcked { id: job_id.clone(), status, printed_at_ms: now }];
        let mut changes = vec![RowChange {
            table: Table::PrintJobs,
            op: ChangeOp::Update,
            household_id: household_id.clone(),
            list_id: None,
        }];
        if let Some(list_id) = clear_list {
            events.push(Event::ListCleared { list_id: list_id.clone() });
            changes.push(RowChange {
                table: Table::ListItems,
                op: ChangeOp::Delete,
                household_id,
                list_id: Some(list_id),
            });
        }

        self.commit(&mut inner, &events, changes)?;
        debug!(job_id = %job_id, %status, "job acknowledged");
        Ok(())
    }

    // ── Printers ──────────────────────────────────────────────────────────

    /// Register the household's printer, generating its id and API key.
    /// The key is returned here and never again.
    pub fn register_printer(
        &self,
        household_id: HouseholdId,
        name: &str,
    ) -> Result<Printer, StoreError> {
        let mut inner = self.inner.lock();
        if inner.state.printer_for_household(&household_id).is_some() {
            return Err(StoreError::Conflict("household already has a printer".to_string()));
        }

        let printer = Printer::new(household_id.clone(), name);
        let change = RowChange {
            table: Table::Printers,
            op: ChangeOp::Insert,
            household_id,
            list_id: None,
        };
        self.commit(
            &mut inner,
            &[Event::PrinterRegistered { printer: printer.clone() }],
            vec![change],
        )?;
        info!(printer_id = %printer.id, "printer registered");
        Ok(printer)
    }

    pub fn printer_for_household(&self, household_id: &HouseholdId) -> Option<Printer> {
        self.inner.lock().state.printer_for_household(household_id).cloned()
    }

    // ── Lists ─────────────────────────────────────────────────────────────

    pub fn create_list(&self, household_id: HouseholdId, name: &str) -> Result<List, StoreError> {
        let list = List::new(household_id.clone(), name, self.clock.epoch_ms());
        let change =
            RowChange { table: Table::Lists, op: ChangeOp::Insert, household_id, list_id: None };
        let mut inner = self.inner.lock();
        self.commit(&mut inner, &[Event::ListCreated { list: list.clone() }], vec![change])?;
        Ok(list)
    }

    pub fn add_item(
        &self,
        list_id: &ListId,
        text: &str,
        position: u32,
        created_by: MemberId,
    ) -> Result<ListItem, StoreError> {
        let mut inner = self.inner.lock();
        let list = inner
            .state
            .lists
            .get(list_id.as_str())
            .ok_or_else(|| StoreError::NotFound(format!("list {list_id}")))?;

        let item = ListItem {
            id: ItemId::new(),
            list_id: list_id.clone(),
            text: text.to_string(),
            checked: false,
            position,
            created_by,
            created_at_ms: self.clock.epoch_ms(),
        };
        let change = RowChange {
            table: Table::ListItems,
            op: ChangeOp::Insert,
            household_id: list.household_id.clone(),
            list_id: Some(list_id.clone()),
        };
        self.commit(&mut inner, &[Event::ItemAdded { item: item.clone() }], vec![change])?;
        Ok(item)
    }

    pub fn set_checked(&self, item_id: &ItemId, checked: bool) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let (list_id, household_id) = self.item_scope(&inner, item_id)?;
        let change = RowChange {
            table: Table::ListItems,
            op: ChangeOp::Update,
            household_id,
            list_id: Some(list_id),
        };
        self.commit(
            &mut inner,
            &[Event::ItemChecked { id: item_id.clone(), checked }],
            vec![change],
        )
    }

    pub fn delete_item(&self, item_id: &ItemId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let (list_id, household_id) = self.item_scope(&inner, item_id)?;
        let change = RowChange {
            table: Table::ListItems,
            op: ChangeOp::Delete,
            household_id,
            list_id: Some(list_id),
        };
        self.commit(&mut inner, &[Event::ItemDeleted { id: item_id.clone() }], vec![change])
    }

    /// All items of a list in display order.
    pub fn items(&self, list_id: &ListId) -> Result<Vec<ListItem>, StoreError> {
        let inner = self.inner.lock();
        if !inner.state.lists.contains_key(list_id.as_str()) {
            return Err(StoreError::NotFound(format!("list {list_id}")));
        }
        Ok(inner.state.items_of(list_id))
    }

    pub fn get_job(&self, id: &JobId) -> Option<PrintJob> {
        self.inner.lock().state.jobs.get(id.as_str()).cloned()
    }

    fn item_scope(
        &self,
        inner: &Inner,
        item_id: &ItemId,
    ) -> Result<(ListId, HouseholdId), StoreError> {
        let item = inner
            .state
            .items
            .get(item_id.as_str())
            .ok_or_else(|| StoreError::NotFound(format!("item {item_id}")))?;
        let household_id = inner
            .state
            .lists
            .get(item.list_id.as_str())
            .map(|l| l.household_id.clone())
            .ok_or_else(|| StoreError::NotFound(format!("list {}", item.list_id)))?;
        Ok((item.list_id.clone(), household_id))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
