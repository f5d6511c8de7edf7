// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! scribe-storage: durable backend store for print jobs, printers, and lists.
//!
//! State is event-sourced: every mutation appends an [`scribe_core::Event`]
//! to an fsynced write-ahead log, then applies it to the in-memory
//! [`MaterializedState`]. Startup replays the log to rebuild state. Row-level
//! change notifications fan out on a broadcast channel for subscribed clients.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod state;
mod store;
mod wal;

pub use state::MaterializedState;
pub use store::{JobStore, StoreError};
pub use wal::{Wal, WalError};
