// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local list projection kept in step with the backend.
//!
//! The reconciler owns a cached snapshot of one list. Change-feed
//! notifications carry no row data, so the reaction to any relevant
//! change is the same: throw the cache away and refetch. Local edits
//! are projected optimistically and either confirmed by the next
//! refetch or rolled back when the backend rejects them.

use std::sync::Arc;

use parking_lot::Mutex;
use scribe_core::{ItemId, ListId, ListItem, RowChange, Table};
use tracing::debug;

use crate::backend::{Backend, BackendError};

pub struct Reconciler {
    list_id: ListId,
    backend: Arc<dyn Backend>,
    items: Mutex<Vec<ListItem>>,
}

impl Reconciler {
    pub fn new(list_id: ListId, backend: Arc<dyn Backend>) -> Self {
        Self { list_id, backend, items: Mutex::new(Vec::new()) }
    }

    /// Current cached snapshot, in display order.
    pub fn snapshot(&self) -> Vec<ListItem> {
        self.items.lock().clone()
    }

    /// Project a local edit before the backend confirms it.
    pub fn apply_local(&self, item: ListItem) {
        let mut items = self.items.lock();
        items.push(item);
        scribe_core::sort_items(&mut items);
    }

    /// Drop an optimistic projection the backend refused.
    pub fn rollback(&self, item_id: &ItemId) {
        self.items.lock().retain(|i| i.id != *item_id);
    }

    /// Does this change invalidate our cache?
    pub fn wants(&self, change: &RowChange) -> bool {
        change.table == Table::ListItems && change.list_id.as_ref() == Some(&self.list_id)
    }

    /// Replace the cache with the backend's current truth.
    pub async fn refetch(&self) -> Result<(), BackendError> {
        let fresh = self.backend.fetch_items(&self.list_id).await?;
        debug!(list_id = %self.list_id, items = fresh.len(), "list refetched");
        *self.items.lock() = fresh;
        Ok(())
    }

    /// Feed one change-feed notification through the reconciler.
    pub async fn on_change(&self, change: &RowChange) -> Result<(), BackendError> {
        if self.wants(change) {
            self.refetch().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
