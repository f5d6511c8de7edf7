// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Print job event handlers.

use scribe_core::Event;

use super::MaterializedState;

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::JobEnqueued { job } => {
            // Idempotency: skip if the job already exists
            if !state.jobs.contains_key(job.id.as_str()) {
                state.jobs.insert(job.id.as_str().to_string(), job.clone());
            }
        }

        Event::JobClaimed { id } => {
            if let Some(job) = state.jobs.get_mut(id.as_str()) {
                // Replay tolerance: a recorded claim is a fact, ignore a
                // repeat rather than erroring.
                let _ = job.claim();
            }
        }

        Event::JobAcked { id, status, printed_at_ms } => {
            if let Some(job) = state.jobs.get_mut(id.as_str()) {
                let _ = job.ack(*status, *printed_at_ms);
            }
        }

        _ => {}
    }
}
