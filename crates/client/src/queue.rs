// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable offline action queue.
//!
//! One JSON object per line, in enqueue order. `enqueue` does not return
//! until the entry is fsynced, so an action acknowledged to the caller
//! survives power loss. Replay order is the file order; timestamps are
//! informational only.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use scribe_core::{ActionId, Clock, QueuedAction, StoredAction};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt queue entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode queue entry: {0}")]
    Encode(#[source] serde_json::Error),
}

struct Inner {
    file: File,
    entries: Vec<StoredAction>,
}

/// Append-only queue of actions awaiting a reachable backend.
pub struct OfflineQueue<C: Clock> {
    clock: C,
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl<C: Clock> OfflineQueue<C> {
    /// Open the queue file, loading any entries a previous run left behind.
    pub fn open(path: &Path, clock: C) -> Result<Self, QueueError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).read(true).open(path)?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(&file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: StoredAction = serde_json::from_str(&line)
                .map_err(|source| QueueError::Corrupt { line: index + 1, source })?;
            entries.push(entry);
        }
        debug!(pending = entries.len(), "offline queue opened");

        Ok(Self { clock, path: path.to_path_buf(), inner: Mutex::new(Inner { file, entries }) })
    }

    /// Persist an action. Returns only after the entry is on disk.
    pub fn enqueue(&self, action: QueuedAction) -> Result<ActionId, QueueError> {
        let entry = StoredAction {
            id: ActionId::new(),
            action,
            created_at_ms: self.clock.epoch_ms(),
        };
        let id = entry.id.clone();

        let mut line = serde_json::to_vec(&entry).map_err(QueueError::Encode)?;
        line.push(b'\n');

        let mut inner = self.inner.lock();
        inner.file.write_all(&line)?;
        inner.file.sync_data()?;
        inner.entries.push(entry);
        debug!(action_id = %id, pending = inner.entries.len(), "action queued");
        Ok(id)
    }

    /// Drop a replayed entry and compact the file.
    ///
    /// Unknown ids are a no-op, so a remove after a duplicate replay
    /// cannot fail.
    pub fn remove(&self, id: &ActionId) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        let Some(index) = inner.entries.iter().position(|e| e.id == *id) else {
            return Ok(());
        };
        inner.entries.remove(index);
        self.rewrite(&mut inner)
    }

    /// Pending actions in enqueue order.
    pub fn actions(&self) -> Vec<StoredAction> {
        self.inner.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Atomically replace the queue file with the surviving entries.
    fn rewrite(&self, inner: &mut Inner) -> Result<(), QueueError> {
        let tmp_path = self.path.with_extension("tmp");
        let mut tmp = File::create(&tmp_path)?;
        for entry in &inner.entries {
            let mut line = serde_json::to_vec(entry).map_err(QueueError::Encode)?;
            line.push(b'\n');
            tmp.write_all(&line)?;
        }
        tmp.sync_data()?;
        std::fs::rename(&tmp_path, &self.path)?;

        inner.file = OpenOptions::new().append(true).read(true).open(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
