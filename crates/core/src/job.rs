// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Print job record and its status state machine.

use crate::id::{HouseholdId, MemberId};
use crate::list::ListId;
use crate::printer::PrinterId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

crate::define_id! {
    /// Unique identifier for a print job.
    pub struct JobId("job-");
}

/// What kind of content a job carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    List,
    Message,
}

crate::simple_display! {
    JobKind {
        List => "list",
        Message => "message",
    }
}

/// Immutable content snapshot taken when the job is created.
///
/// List jobs carry the title plus pre-rendered lines with checked-state
/// markers (`[x] milk`); message jobs carry free text. The snapshot is
/// what gets dispatched — later edits to the underlying list never change
/// what a claimed job prints.
///
/// The JSON shape matches what the printer firmware consumes:
/// `{"title": ..., "items": [...]}` or `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobContent {
    List { title: String, items: Vec<String> },
    Message { message: String },
}

impl JobContent {
    pub fn kind(&self) -> JobKind {
        match self {
            JobContent::List { .. } => JobKind::List,
            JobContent::Message { .. } => JobKind::Message,
        }
    }
}

/// Lifecycle status of a print job.
///
/// Transitions are monotonic: pending → printing → {done, failed}.
/// Terminal states never transition again, and nothing skips printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Printing,
    Done,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Printing => "printing",
        Done => "done",
        Failed => "failed",
    }
}

/// Terminal status reported by the consumer device in an acknowledge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Done,
    Failed,
}

impl AckStatus {
    /// Parse the wire-level status string. Anything other than `done` or
    /// `failed` is a validation error at the protocol boundary.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "done" => Some(AckStatus::Done),
            "failed" => Some(AckStatus::Failed),
            _ => None,
        }
    }
}

impl From<AckStatus> for JobStatus {
    fn from(s: AckStatus) -> Self {
        match s {
            AckStatus::Done => JobStatus::Done,
            AckStatus::Failed => JobStatus::Failed,
        }
    }
}

crate::simple_display! {
    AckStatus {
        Done => "done",
        Failed => "failed",
    }
}

/// Rejected status transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("job is {actual}, only pending jobs can be claimed")]
    NotPending { actual: JobStatus },

    #[error("job is {actual}, only printing jobs can be acknowledged")]
    NotPrinting { actual: JobStatus },
}

/// Caller-supplied fields for a new print job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDraft {
    pub household_id: HouseholdId,
    pub printer_id: PrinterId,
    pub created_by: MemberId,
    pub content: JobContent,
    #[serde(default)]
    pub clear_after_print: bool,
    #[serde(default)]
    pub list_id: Option<ListId>,
}

impl JobDraft {
    pub fn builder(
        household_id: HouseholdId,
        printer_id: PrinterId,
        created_by: MemberId,
        content: JobContent,
    ) -> JobDraftBuilder {
        JobDraftBuilder {
            household_id,
            printer_id,
            created_by,
            content,
            clear_after_print: false,
            list_id: None,
        }
    }
}

pub struct JobDraftBuilder {
    household_id: HouseholdId,
    printer_id: PrinterId,
    created_by: MemberId,
    content: JobContent,
    clear_after_print: bool,
    list_id: Option<ListId>,
}

impl JobDraftBuilder {
    crate::setters! {
        set {
            clear_after_print: bool,
        }
        option {
            list_id: ListId,
        }
    }

    pub fn build(self) -> JobDraft {
        JobDraft {
            household_id: self.household_id,
            printer_id: self.printer_id,
            created_by: self.created_by,
            content: self.content,
            clear_after_print: self.clear_after_print,
            list_id: self.list_id,
        }
    }
}

/// A durable print job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: JobId,
    pub household_id: HouseholdId,
    pub printer_id: PrinterId,
    pub content: JobContent,
    pub clear_after_print: bool,
    pub list_id: Option<ListId>,
    pub status: JobStatus,
    pub created_by: MemberId,
    pub created_at_ms: u64,
    pub printed_at_ms: Option<u64>,
}

impl PrintJob {
    /// Create a new pending job from a draft.
    pub fn new(draft: JobDraft, created_at_ms: u64) -> Self {
        Self {
            id: JobId::new(),
            household_id: draft.household_id,
            printer_id: draft.printer_id,
            content: draft.content,
            clear_after_print: draft.clear_after_print,
            list_id: draft.list_id,
            status: JobStatus::Pending,
            created_by: draft.created_by,
            created_at_ms,
            printed_at_ms: None,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.content.kind()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Transition pending → printing (the claim).
    pub fn claim(&mut self) -> Result<(), TransitionError> {
        if self.status != JobStatus::Pending {
            return Err(TransitionError::NotPending { actual: self.status });
        }
        self.status = JobStatus::Printing;
        Ok(())
    }

    /// Transition printing → done/failed and stamp `printed_at`.
    pub fn ack(&mut self, status: AckStatus, printed_at_ms: u64) -> Result<(), TransitionError> {
        if self.status != JobStatus::Printing {
            return Err(TransitionError::NotPrinting { actual: self.status });
        }
        self.status = status.into();
        self.printed_at_ms = Some(printed_at_ms);
        Ok(())
    }
}

crate::builder! {
    pub struct PrintJobBuilder => PrintJob {
        into {
            id: JobId = "job-test1",
            household_id: HouseholdId = "hh-test1",
            printer_id: PrinterId = "prn-test1",
            created_by: MemberId = "usr-test1",
        }
        set {
            content: JobContent = JobContent::Message { message: "hello".to_string() },
            clear_after_print: bool = false,
            status: JobStatus = JobStatus::Pending,
            created_at_ms: u64 = 0,
        }
        option {
            list_id: ListId = None,
            printed_at_ms: u64 = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
