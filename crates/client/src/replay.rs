// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay of queued actions after connectivity returns.
//!
//! One pass runs at a time. A reconnect that arrives mid-pass sets a
//! rerun flag instead of starting a second pass, so flapping
//! connectivity coalesces into one extra sweep rather than a pile-up
//! of concurrent replays.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use scribe_core::{ActionId, Clock, MemberId};
use tracing::{info, warn};

use crate::backend::{Backend, BackendError};
use crate::queue::OfflineQueue;

/// Result of one reconnect notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// The queue was swept to the end.
    Completed { replayed: usize, rejected: usize },
    /// The backend went away mid-pass; this many entries still wait.
    Aborted { remaining: usize },
    /// Another pass is running and will rerun for us.
    AlreadyRunning,
}

/// Drains the offline queue against the backend, oldest first.
///
/// Durability is at-least-once: an action the backend applied but whose
/// response was lost stays queued and replays again. Handlers on the
/// backend side are idempotent or harmless on duplicates.
///
/// An entry leaves the queue only once the backend confirms the write.
/// A rejected entry stays in the queue, marked so later automatic
/// passes skip it; [`Replayer::retry_rejected`] clears the marks.
pub struct Replayer<C: Clock> {
    queue: Arc<OfflineQueue<C>>,
    backend: Arc<dyn Backend>,
    member_id: MemberId,
    pass: tokio::sync::Mutex<()>,
    rerun: AtomicBool,
    rejected: Mutex<HashSet<ActionId>>,
}

impl<C: Clock> Replayer<C> {
    pub fn new(queue: Arc<OfflineQueue<C>>, backend: Arc<dyn Backend>, member_id: MemberId) -> Self {
        Self {
            queue,
            backend,
            member_id,
            pass: tokio::sync::Mutex::new(()),
            rerun: AtomicBool::new(false),
            rejected: Mutex::new(HashSet::new()),
        }
    }

    /// Kick a replay pass. Safe to call on every reconnect signal.
    pub async fn on_reconnect(&self) -> ReplayOutcome {
        let Ok(guard) = self.pass.try_lock() else {
            // A running pass picks the flag up before releasing the lock
            self.rerun.store(true, Ordering::SeqCst);
            return ReplayOutcome::AlreadyRunning;
        };

        let mut replayed = 0;
        let mut rejected = 0;
        loop {
            match self.run_pass().await {
                Ok((r, j)) => {
                    replayed += r;
                    rejected += j;
                }
                Err(remaining) => {
                    drop(guard);
                    return ReplayOutcome::Aborted { remaining };
                }
            }
            if !self.rerun.swap(false, Ordering::SeqCst) {
                break;
            }
        }
        drop(guard);

        if replayed > 0 || rejected > 0 {
            info!(replayed, rejected, "offline queue replayed");
        }
        ReplayOutcome::Completed { replayed, rejected }
    }

    /// Clear rejection marks so the next pass reattempts those entries.
    pub fn retry_rejected(&self) {
        self.rejected.lock().clear();
    }

    /// One sweep over the queue in enqueue order.
    ///
    /// Rejected entries stay queued but are marked and counted; the rest
    /// of the queue still replays. Transport failure aborts the pass with
    /// the number of entries left.
    async fn run_pass(&self) -> Result<(usize, usize), usize> {
        let mut replayed = 0;
        let mut rejected = 0;

        let entries = self.queue.actions();
        for (index, entry) in entries.iter().enumerate() {
            if self.rejected.lock().contains(&entry.id) {
                continue;
            }
            match self.backend.apply(self.member_id.clone(), entry.action.clone()).await {
                Ok(()) => {
                    if let Err(e) = self.queue.remove(&entry.id) {
                        warn!(action_id = %entry.id, "cannot compact queue: {e}");
                    }
                    replayed += 1;
                }
                Err(BackendError::Rejected { kind, message }) => {
                    warn!(action_id = %entry.id, %kind, "queued action rejected, left queued: {message}");
                    self.rejected.lock().insert(entry.id.clone());
                    rejected += 1;
                }
                Err(BackendError::Unreachable(reason)) => {
                    warn!("replay aborted, backend unreachable: {reason}");
                    return Err(entries.len() - index);
                }
            }
        }
        Ok((replayed, rejected))
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
