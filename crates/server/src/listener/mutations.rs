// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Household-facing mutation handlers.

use scribe_core::{Clock, HouseholdId, JobDraft, MemberId, QueuedAction};
use scribe_storage::JobStore;
use scribe_wire::{ErrorKind, Response};

use super::store_error;

/// Register the household's printer. The response is the only place the
/// generated API key ever leaves the daemon.
pub(crate) fn handle_register_printer<C: Clock>(
    store: &JobStore<C>,
    household_id: HouseholdId,
    name: &str,
) -> Response {
    match store.register_printer(household_id, name) {
        Ok(printer) => Response::PrinterRegistered { printer: Box::new(printer) },
        Err(e) => store_error(e),
    }
}

pub(crate) fn handle_create_job<C: Clock>(store: &JobStore<C>, draft: JobDraft) -> Response {
    if let scribe_core::JobContent::Message { message } = &draft.content {
        if message.trim().is_empty() {
            return Response::Error {
                kind: ErrorKind::Validation,
                message: "message must not be empty".to_string(),
            };
        }
    }
    match store.enqueue(draft) {
        Ok(id) => Response::JobCreated { id },
        Err(e) => store_error(e),
    }
}

/// Apply one deferred mutation. Replayed offline actions and live edits
/// go through the same path.
pub(crate) fn handle_apply<C: Clock>(
    store: &JobStore<C>,
    member_id: MemberId,
    action: QueuedAction,
) -> Response {
    let result = match action {
        QueuedAction::AddListItem { list_id, text, position } => {
            store.add_item(&list_id, &text, position, member_id).map(|_| Response::Ok)
        }
        QueuedAction::CheckListItem { item_id, checked } => {
            store.set_checked(&item_id, checked).map(|()| Response::Ok)
        }
        QueuedAction::DeleteListItem { item_id } => {
            store.delete_item(&item_id).map(|()| Response::Ok)
        }
        // temp_id is client-side bookkeeping; the store assigns the real id
        // and the response carries it back for remapping
        QueuedAction::AddList { household_id, name, temp_id: _ } => store
            .create_list(household_id, &name)
            .map(|list| Response::ListCreated { list: Box::new(list) }),
    };
    result.unwrap_or_else(store_error)
}

#[cfg(test)]
#[path = "mutations_tests.rs"]
mod tests;
