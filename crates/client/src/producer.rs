// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Print job production.
//!
//! The producer turns a list or a message into an immutable content
//! snapshot and enqueues it. All preconditions (a registered printer,
//! a non-empty list or message) are checked before anything is written,
//! so a refused print leaves no trace.

use std::sync::Arc;

use scribe_core::{HouseholdId, JobContent, JobDraft, JobId, ListId, ListItem, MemberId};
use thiserror::Error;
use tracing::info;

use crate::backend::{Backend, BackendError};

#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("household has no registered printer")]
    NoPrinter,

    #[error("list has no items to print")]
    EmptyList,

    #[error("message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Render items into printable lines with checked-state markers.
///
/// Items are expected in display order; the marker format (`[x]` / `[ ]`)
/// is what the printer firmware renders verbatim.
pub fn render_lines(items: &[ListItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let marker = if item.checked { "[x]" } else { "[ ]" };
            format!("{marker} {}", item.text)
        })
        .collect()
}

pub struct Producer {
    backend: Arc<dyn Backend>,
    household_id: HouseholdId,
    member_id: MemberId,
}

impl Producer {
    pub fn new(backend: Arc<dyn Backend>, household_id: HouseholdId, member_id: MemberId) -> Self {
        Self { backend, household_id, member_id }
    }

    /// Snapshot a list and enqueue it as a print job.
    pub async fn print_list(
        &self,
        list_id: &ListId,
        title: &str,
        clear_after_print: bool,
    ) -> Result<JobId, ProducerError> {
        let printer = self
            .backend
            .printer_for(&self.household_id)
            .await?
            .ok_or(ProducerError::NoPrinter)?;

        let items = self.backend.fetch_items(list_id).await?;
        if items.is_empty() {
            return Err(ProducerError::EmptyList);
        }

        let content =
            JobContent::List { title: title.to_string(), items: render_lines(&items) };
        let draft = JobDraft::builder(
            self.household_id.clone(),
            printer.id,
            self.member_id.clone(),
            content,
        )
        .clear_after_print(clear_after_print)
        .list_id(list_id.clone())
        .build();

        let id = self.backend.create_job(draft).await?;
        info!(job_id = %id, list_id = %list_id, "list job enqueued");
        Ok(id)
    }

    /// Enqueue a free-text message job.
    pub async fn print_message(&self, message: &str) -> Result<JobId, ProducerError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ProducerError::EmptyMessage);
        }

        let printer = self
            .backend
            .printer_for(&self.household_id)
            .await?
            .ok_or(ProducerError::NoPrinter)?;

        let draft = JobDraft::builder(
            self.household_id.clone(),
            printer.id,
            self.member_id.clone(),
            JobContent::Message { message: message.to_string() },
        )
        .build();

        let id = self.backend.create_job(draft).await?;
        info!(job_id = %id, "message job enqueued");
        Ok(id)
    }
}

#[cfg(test)]
#[path = "producer_tests.rs"]
mod tests;
