// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only query handlers.

use scribe_core::{Clock, HouseholdId, JobId, ListId};
use scribe_storage::JobStore;
use scribe_wire::Response;

use super::store_error;

pub(crate) fn handle_fetch_items<C: Clock>(store: &JobStore<C>, list_id: &ListId) -> Response {
    match store.items(list_id) {
        Ok(items) => Response::Items { items },
        Err(e) => store_error(e),
    }
}

/// Missing jobs are not an error; reconcilers probe ids they may have
/// only heard about through the change feed.
pub(crate) fn handle_get_job<C: Clock>(store: &JobStore<C>, id: &JobId) -> Response {
    Response::JobDetail { job: store.get_job(id).map(Box::new) }
}

pub(crate) fn handle_get_printer<C: Clock>(
    store: &JobStore<C>,
    household_id: &HouseholdId,
) -> Response {
    Response::Printer { printer: store.printer_for_household(household_id).map(Box::new) }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
