// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`Backend`] fake shared by the client unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use scribe_core::{
    HouseholdId, JobDraft, JobId, List, ListId, ListItem, MemberId, Printer, QueuedAction,
};

use crate::backend::{Backend, BackendError};

#[derive(Default)]
pub(crate) struct FakeBackend {
    /// Actions the backend accepted, in arrival order.
    pub applied: Mutex<Vec<QueuedAction>>,
    pub drafts: Mutex<Vec<JobDraft>>,
    pub items: Mutex<Vec<ListItem>>,
    pub printer: Mutex<Option<Printer>>,
    pub fetches: AtomicUsize,
    /// Scripted outcomes served by `apply` before it defaults to Ok.
    pub scripted: Mutex<VecDeque<Result<(), BackendError>>>,
    pub offline: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn script(&self, outcome: Result<(), BackendError>) {
        self.scripted.lock().push_back(outcome);
    }

    fn check_online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Unreachable("socket refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn apply(&self, _member_id: MemberId, action: QueuedAction) -> Result<(), BackendError> {
        self.check_online()?;
        if let Some(outcome) = self.scripted.lock().pop_front() {
            outcome?;
        }
        self.applied.lock().push(action);
        Ok(())
    }

    async fn create_list(
        &self,
        _member_id: MemberId,
        household_id: HouseholdId,
        name: &str,
    ) -> Result<List, BackendError> {
        self.check_online()?;
        Ok(List::new(household_id, name, 0))
    }

    async fn create_job(&self, draft: JobDraft) -> Result<JobId, BackendError> {
        self.check_online()?;
        self.drafts.lock().push(draft);
        Ok(JobId::new())
    }

    async fn fetch_items(&self, _list_id: &ListId) -> Result<Vec<ListItem>, BackendError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.items.lock().clone())
    }

    async fn printer_for(
        &self,
        _household_id: &HouseholdId,
    ) -> Result<Option<Printer>, BackendError> {
        self.check_online()?;
        Ok(self.printer.lock().clone())
    }
}
