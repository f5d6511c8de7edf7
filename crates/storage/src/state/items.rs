// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! List and list item event handlers.

use scribe_core::Event;

use super::MaterializedState;

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::ListCreated { list } => {
            if !state.lists.contains_key(list.id.as_str()) {
                state.lists.insert(list.id.as_str().to_string(), list.clone());
            }
        }

        Event::ItemAdded { item } => {
            if !state.items.contains_key(item.id.as_str()) {
                state.items.insert(item.id.as_str().to_string(), item.clone());
            }
        }

        Event::ItemChecked { id, checked } => {
            if let Some(item) = state.items.get_mut(id.as_str()) {
                item.checked = *checked;
            }
        }

        Event::ItemDeleted { id } => {
            state.items.remove(id.as_str());
        }

        Event::ListCleared { list_id } => {
            state.items.retain(|_, item| item.list_id != *list_id);
        }

        _ => {}
    }
}
