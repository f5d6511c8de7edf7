// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Device-side library: backend access, the offline action queue, replay,
//! list reconciliation, and the print-job producer.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod backend;
mod producer;
mod queue;
mod reconcile;
mod replay;
mod sync;

#[cfg(test)]
mod test_backend;

pub use backend::{Backend, BackendError, RemoteBackend};
pub use producer::{render_lines, Producer, ProducerError};
pub use queue::{OfflineQueue, QueueError};
pub use reconcile::Reconciler;
pub use replay::{ReplayOutcome, Replayer};
pub use sync::{SubmitOutcome, SyncClient};
