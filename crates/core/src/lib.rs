// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! scribe-core: domain types for the Scribe print dispatch backend and client.

pub mod macros;

pub mod action;
pub mod clock;
pub mod event;
pub mod id;
pub mod job;
pub mod list;
pub mod printer;

pub use action::{ActionId, QueuedAction, StoredAction};
pub use clock::{Clock, FakeClock, SystemClock};
pub use event::{ChangeOp, Event, RowChange, Table};
pub use id::{HouseholdId, MemberId};
pub use job::{
    AckStatus, JobContent, JobDraft, JobDraftBuilder, JobId, JobKind, JobStatus, PrintJob,
    TransitionError,
};
#[cfg(any(test, feature = "test-support"))]
pub use job::PrintJobBuilder;
pub use list::{sort_items, ItemId, List, ListId, ListItem};
#[cfg(any(test, feature = "test-support"))]
pub use list::ListItemBuilder;
pub use printer::{ApiKey, Printer, PrinterId};
