// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end dispatch protocol: register, produce, poll, ack.

use std::sync::Arc;

use scribe_client::{Producer, RemoteBackend};
use scribe_core::{JobContent, JobStatus, MemberId, Printer};
use scribe_wire::{ErrorKind, Request, Response};

use super::helpers::TestDaemon;

async fn register(daemon: &TestDaemon, household: &str) -> Printer {
    match daemon
        .call(Request::RegisterPrinter { household_id: household.into(), name: "Kitchen".into() })
        .await
    {
        Response::PrinterRegistered { printer } => *printer,
        other => panic!("registration failed: {other:?}"),
    }
}

#[tokio::test]
async fn full_job_lifecycle_over_the_socket() {
    let daemon = TestDaemon::start().await;
    let printer = register(&daemon, "hh-1").await;

    let backend = Arc::new(RemoteBackend::new(&daemon.socket));
    let producer =
        Producer::new(backend.clone(), "hh-1".into(), MemberId::from_string("usr-1"));

    let job_id = producer.print_message("dinner at 7").await.expect("print message");

    // Printer polls and receives the ticket
    let ticket = match daemon
        .call(Request::Poll { printer_id: printer.id.clone(), api_key: printer.api_key.clone() })
        .await
    {
        Response::Job { job: Some(ticket) } => ticket,
        other => panic!("expected ticket, got {other:?}"),
    };
    assert_eq!(ticket.id, job_id);
    assert_eq!(ticket.content, JobContent::Message { message: "dinner at 7".into() });

    // Ack done; the job record reflects it
    let response = daemon
        .call(Request::Ack {
            job_id: job_id.clone(),
            api_key: printer.api_key.clone(),
            status: "done".into(),
        })
        .await;
    assert!(matches!(response, Response::Ok), "ack failed: {response:?}");

    match daemon.call(Request::GetJob { id: job_id }).await {
        Response::JobDetail { job: Some(job) } => {
            assert_eq!(job.status, JobStatus::Done);
            assert!(job.printed_at_ms.is_some());
        }
        other => panic!("expected job detail, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_queue_poll_and_last_seen() {
    let daemon = TestDaemon::start().await;
    let printer = register(&daemon, "hh-1").await;

    match daemon
        .call(Request::Poll { printer_id: printer.id.clone(), api_key: printer.api_key.clone() })
        .await
    {
        Response::Job { job: None } => {}
        other => panic!("expected empty poll, got {other:?}"),
    }

    // The empty poll still stamped last_seen
    match daemon.call(Request::GetPrinter { household_id: "hh-1".into() }).await {
        Response::Printer { printer: Some(p) } => assert!(p.last_seen_ms.is_some()),
        other => panic!("expected printer, got {other:?}"),
    }
}

#[tokio::test]
async fn wrong_key_is_rejected_without_claiming() {
    let daemon = TestDaemon::start().await;
    let printer = register(&daemon, "hh-1").await;

    let backend = Arc::new(RemoteBackend::new(&daemon.socket));
    let producer =
        Producer::new(backend, "hh-1".into(), MemberId::from_string("usr-1"));
    producer.print_message("hello").await.expect("print message");

    match daemon
        .call(Request::Poll { printer_id: printer.id.clone(), api_key: "bogus".into() })
        .await
    {
        Response::Error { kind: ErrorKind::Auth, .. } => {}
        other => panic!("expected auth error, got {other:?}"),
    }

    // The job is intact for the holder of the real key
    match daemon
        .call(Request::Poll { printer_id: printer.id, api_key: printer.api_key })
        .await
    {
        Response::Job { job: Some(_) } => {}
        other => panic!("job should still be pending, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_polls_deliver_each_job_once() {
    let daemon = TestDaemon::start().await;
    let printer = register(&daemon, "hh-1").await;

    let backend = Arc::new(RemoteBackend::new(&daemon.socket));
    let producer =
        Producer::new(backend, "hh-1".into(), MemberId::from_string("usr-1"));
    for i in 0..3 {
        producer.print_message(&format!("note {i}")).await.expect("print message");
    }

    let daemon = Arc::new(daemon);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let daemon = Arc::clone(&daemon);
        let printer_id = printer.id.clone();
        let api_key = printer.api_key.clone();
        handles.push(tokio::spawn(async move {
            match daemon.call(Request::Poll { printer_id, api_key }).await {
                Response::Job { job } => job.map(|t| t.id),
                other => panic!("poll failed: {other:?}"),
            }
        }));
    }

    let mut claimed = Vec::new();
    for handle in handles {
        if let Some(id) = handle.await.expect("join") {
            claimed.push(id);
        }
    }
    claimed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    claimed.dedup();
    assert_eq!(claimed.len(), 3, "three jobs, each claimed exactly once");
}

#[tokio::test]
async fn unknown_ack_status_changes_nothing() {
    let daemon = TestDaemon::start().await;
    let printer = register(&daemon, "hh-1").await;

    let backend = Arc::new(RemoteBackend::new(&daemon.socket));
    let producer =
        Producer::new(backend, "hh-1".into(), MemberId::from_string("usr-1"));
    let job_id = producer.print_message("hello").await.expect("print message");

    daemon
        .call(Request::Poll { printer_id: printer.id.clone(), api_key: printer.api_key.clone() })
        .await;

    match daemon
        .call(Request::Ack {
            job_id: job_id.clone(),
            api_key: printer.api_key.clone(),
            status: "finished".into(),
        })
        .await
    {
        Response::Error { kind: ErrorKind::Validation, .. } => {}
        other => panic!("expected validation error, got {other:?}"),
    }

    match daemon.call(Request::GetJob { id: job_id }).await {
        Response::JobDetail { job: Some(job) } => assert_eq!(job.status, JobStatus::Printing),
        other => panic!("expected job detail, got {other:?}"),
    }
}

#[tokio::test]
async fn second_ack_is_a_conflict() {
    let daemon = TestDaemon::start().await;
    let printer = register(&daemon, "hh-1").await;

    let backend = Arc::new(RemoteBackend::new(&daemon.socket));
    let producer =
        Producer::new(backend, "hh-1".into(), MemberId::from_string("usr-1"));
    let job_id = producer.print_message("hello").await.expect("print message");

    daemon
        .call(Request::Poll { printer_id: printer.id.clone(), api_key: printer.api_key.clone() })
        .await;
    daemon
        .call(Request::Ack {
            job_id: job_id.clone(),
            api_key: printer.api_key.clone(),
            status: "done".into(),
        })
        .await;

    match daemon
        .call(Request::Ack { job_id, api_key: printer.api_key.clone(), status: "failed".into() })
        .await
    {
        Response::Error { kind: ErrorKind::Conflict, .. } => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn one_printer_per_household() {
    let daemon = TestDaemon::start().await;
    register(&daemon, "hh-1").await;

    match daemon
        .call(Request::RegisterPrinter { household_id: "hh-1".into(), name: "Garage".into() })
        .await
    {
        Response::Error { kind: ErrorKind::Conflict, .. } => {}
        other => panic!("expected conflict, got {other:?}"),
    }

    // A different household is unaffected
    register(&daemon, "hh-2").await;
}
