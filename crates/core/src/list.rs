// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared lists and their items.

use crate::id::{HouseholdId, MemberId};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a shared list.
    pub struct ListId("lst-");
}

crate::define_id! {
    /// Unique identifier for a list item.
    pub struct ItemId("itm-");
}

/// A shared list owned by a household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub household_id: HouseholdId,
    pub name: String,
    pub created_at_ms: u64,
}

impl List {
    pub fn new(household_id: HouseholdId, name: impl Into<String>, created_at_ms: u64) -> Self {
        Self { id: ListId::new(), household_id, name: name.into(), created_at_ms }
    }
}

/// A single entry in a shared list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: ItemId,
    pub list_id: ListId,
    pub text: String,
    pub checked: bool,
    /// Intra-list order; ties broken by `created_at_ms` ascending.
    pub position: u32,
    pub created_by: MemberId,
    pub created_at_ms: u64,
}

/// Sort items into display/print order: position ascending, ties broken
/// by creation time ascending.
pub fn sort_items(items: &mut [ListItem]) {
    items.sort_by(|a, b| {
        a.position.cmp(&b.position).then(a.created_at_ms.cmp(&b.created_at_ms))
    });
}

crate::builder! {
    pub struct ListItemBuilder => ListItem {
        into {
            id: ItemId = "itm-test1",
            list_id: ListId = "lst-test1",
            text: String = "milk",
            created_by: MemberId = "usr-test1",
        }
        set {
            checked: bool = false,
            position: u32 = 0,
            created_at_ms: u64 = 0,
        }
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
