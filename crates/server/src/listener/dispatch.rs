// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Printer-facing dispatch handlers: poll and ack.

use scribe_core::{AckStatus, ApiKey, Clock, JobId, PrinterId};
use scribe_storage::JobStore;
use scribe_wire::{ErrorKind, JobTicket, Response};

use super::store_error;

/// Claim the oldest pending job for an authenticated printer.
///
/// An empty queue is not an error; the printer gets `Job { job: None }`
/// and polls again later.
pub(crate) fn handle_poll<C: Clock>(
    store: &JobStore<C>,
    printer_id: &PrinterId,
    api_key: &ApiKey,
) -> Response {
    match store.claim_next(printer_id, api_key) {
        Ok(job) => Response::Job { job: job.as_ref().map(|j| Box::new(JobTicket::from(j))) },
        Err(e) => store_error(e),
    }
}

/// Record a printer's terminal status for a claimed job.
///
/// The status string is validated here at the protocol boundary; a bad
/// value is rejected before the store is touched.
pub(crate) fn handle_ack<C: Clock>(
    store: &JobStore<C>,
    job_id: &JobId,
    api_key: &ApiKey,
    status: &str,
) -> Response {
    let Some(status) = AckStatus::parse(status) else {
        return Response::Error {
            kind: ErrorKind::Validation,
            message: format!("unknown ack status {status:?}, expected \"done\" or \"failed\""),
        };
    };
    match store.ack(job_id, api_key, status) {
        Ok(()) => Response::Ok,
        Err(e) => store_error(e),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
