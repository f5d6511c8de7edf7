// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change-feed streaming.
//!
//! A subscribed connection receives row-level change notifications for
//! one household, optionally narrowed to a single list. Notifications
//! carry no row data; clients refetch whatever the change invalidates.

use scribe_core::{Clock, HouseholdId, ListId, RowChange};
use scribe_storage::JobStore;
use scribe_wire::{ProtocolError, Response};
use tokio::io::AsyncWrite;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub(crate) async fn stream_changes<S, C: Clock>(
    stream: &mut S,
    store: &JobStore<C>,
    shutdown: &CancellationToken,
    household_id: HouseholdId,
    list_id: Option<ListId>,
) -> Result<(), ProtocolError>
where
    S: AsyncWrite + Unpin,
{
    // Subscribe before acking so no change between the two is lost
    let mut rx = store.subscribe();
    scribe_wire::write_response(stream, &Response::Subscribed).await?;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            result = rx.recv() => match result {
                Ok(change) => {
                    if wants(&change, &household_id, list_id.as_ref()) {
                        scribe_wire::write_response(stream, &Response::Change { change }).await?;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Dropped notifications only mean a stale cache; the
                    // client's next refetch repairs it
                    warn!(skipped, "change feed subscriber lagged");
                }
                Err(RecvError::Closed) => {
                    debug!("change feed closed");
                    return Ok(());
                }
            },
        }
    }
}

/// Household scoping, with an optional per-list narrowing.
fn wants(change: &RowChange, household_id: &HouseholdId, list_id: Option<&ListId>) -> bool {
    if change.household_id != *household_id {
        return false;
    }
    match list_id {
        None => true,
        Some(wanted) => change.list_id.as_ref() == Some(wanted),
    }
}

#[cfg(test)]
#[path = "subscribe_tests.rs"]
mod tests;
