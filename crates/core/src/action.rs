// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred client mutations for the offline queue.

use crate::id::HouseholdId;
use crate::list::{ItemId, ListId};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Locally generated identifier for a queued action.
    ///
    /// Used only for local removal bookkeeping after a successful replay;
    /// it is never sent to the backend.
    pub struct ActionId("act-");
}

/// A mutation that could not reach the backend.
///
/// The JSON shape is `{"type": "ADD_LIST_ITEM", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueuedAction {
    AddListItem {
        list_id: ListId,
        text: String,
        position: u32,
    },
    CheckListItem {
        item_id: ItemId,
        checked: bool,
    },
    DeleteListItem {
        item_id: ItemId,
    },
    AddList {
        household_id: HouseholdId,
        name: String,
        /// Placeholder id the client projection used while offline.
        temp_id: ListId,
    },
}

/// A queued action as persisted on the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAction {
    pub id: ActionId,
    #[serde(flatten)]
    pub action: QueuedAction,
    pub created_at_ms: u64,
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
