// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-level projections of store records.

use scribe_core::{JobContent, JobId, ListId, PrintJob};
use serde::{Deserialize, Serialize};

/// What a printer needs to render a claimed job.
///
/// Deliberately smaller than [`PrintJob`]: no household, no creator, no
/// timestamps. The printer acks by id and never sees bookkeeping fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobTicket {
    pub id: JobId,
    pub content: JobContent,
    pub clear_after_print: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
}

impl From<&PrintJob> for JobTicket {
    fn from(job: &PrintJob) -> Self {
        Self {
            id: job.id.clone(),
            content: job.content.clone(),
            clear_after_print: job.clear_after_print,
            list_id: job.list_id.clone(),
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
