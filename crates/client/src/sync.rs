// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Online/offline submission front door.
//!
//! Mutations go straight to the backend while it is reachable and into
//! the durable queue when it is not. The first transport failure flips
//! the client offline; a connectivity signal flips it back and kicks a
//! replay pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use scribe_core::{ActionId, Clock, MemberId, QueuedAction};
use scribe_wire::ErrorKind;
use tracing::{debug, info};

use crate::backend::{Backend, BackendError};
use crate::queue::{OfflineQueue, QueueError};
use crate::replay::{ReplayOutcome, Replayer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend applied the action.
    Sent,
    /// The backend is unreachable; the action is durably queued.
    Queued(ActionId),
    /// The backend refused the action. Nothing was queued; retrying the
    /// same action cannot succeed.
    Rejected { kind: ErrorKind, message: String },
}

pub struct SyncClient<C: Clock> {
    backend: Arc<dyn Backend>,
    queue: Arc<OfflineQueue<C>>,
    replayer: Arc<Replayer<C>>,
    member_id: MemberId,
    online: AtomicBool,
}

impl<C: Clock> SyncClient<C> {
    pub fn new(
        backend: Arc<dyn Backend>,
        queue: Arc<OfflineQueue<C>>,
        replayer: Arc<Replayer<C>>,
        member_id: MemberId,
    ) -> Self {
        Self { backend, queue, replayer, member_id, online: AtomicBool::new(true) }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Submit a mutation, queueing it when the backend is unreachable.
    pub async fn submit(&self, action: QueuedAction) -> Result<SubmitOutcome, QueueError> {
        if !self.is_online() {
            let id = self.queue.enqueue(action)?;
            debug!(action_id = %id, "offline, action queued");
            return Ok(SubmitOutcome::Queued(id));
        }

        match self.backend.apply(self.member_id.clone(), action.clone()).await {
            Ok(()) => Ok(SubmitOutcome::Sent),
            Err(BackendError::Rejected { kind, message }) => {
                Ok(SubmitOutcome::Rejected { kind, message })
            }
            Err(BackendError::Unreachable(reason)) => {
                info!("backend unreachable, going offline: {reason}");
                self.online.store(false, Ordering::SeqCst);
                let id = self.queue.enqueue(action)?;
                Ok(SubmitOutcome::Queued(id))
            }
        }
    }

    /// Report a connectivity change. Coming back online replays the queue.
    pub async fn set_online(&self, online: bool) -> Option<ReplayOutcome> {
        let was_online = self.online.swap(online, Ordering::SeqCst);
        if online && !was_online {
            info!("connectivity restored, replaying offline queue");
            return Some(self.replayer.on_reconnect().await);
        }
        None
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
