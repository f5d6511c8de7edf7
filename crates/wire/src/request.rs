// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use scribe_core::{ApiKey, HouseholdId, JobDraft, JobId, ListId, MemberId, PrinterId, QueuedAction};
use serde::{Deserialize, Serialize};

/// Request from a client to the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Version handshake
    Hello { version: String },

    /// Printer asks for its next pending job
    Poll { printer_id: PrinterId, api_key: ApiKey },

    /// Printer reports the outcome of a claimed job.
    ///
    /// `status` is the raw string off the wire ("done" or "failed");
    /// the daemon validates it before touching the store.
    Ack {
        job_id: JobId,
        api_key: ApiKey,
        status: String,
    },

    /// Register the printer for a household
    RegisterPrinter { household_id: HouseholdId, name: String },

    /// Look up the registered printer for a household
    GetPrinter { household_id: HouseholdId },

    /// Enqueue a print job
    CreateJob { draft: JobDraft },

    /// Apply a list mutation on behalf of a household member
    Apply { member_id: MemberId, action: QueuedAction },

    /// Fetch the items of a list in display order
    FetchItems { list_id: ListId },

    /// Fetch a single job
    GetJob { id: JobId },

    /// Switch this connection to a change-feed stream.
    ///
    /// After `Subscribed` the daemon sends `Change` frames until the
    /// client hangs up; no further requests are read.
    Subscribe {
        household_id: HouseholdId,
        #[serde(default)]
        list_id: Option<ListId>,
    },
}
