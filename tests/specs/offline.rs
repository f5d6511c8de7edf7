// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queueing, replay against a live daemon, and change-feed
//! driven reconciliation.

use std::sync::Arc;

use scribe_client::{
    Backend, OfflineQueue, Producer, Reconciler, RemoteBackend, ReplayOutcome, Replayer,
    SubmitOutcome, SyncClient,
};
use scribe_core::{ChangeOp, MemberId, QueuedAction, SystemClock, Table};
use scribe_wire::{Request, Response};

use super::helpers::TestDaemon;

fn member() -> MemberId {
    MemberId::from_string("usr-1")
}

fn add_item(list_id: &scribe_core::ListId, text: &str, position: u32) -> QueuedAction {
    QueuedAction::AddListItem { list_id: list_id.clone(), text: text.to_string(), position }
}

#[tokio::test]
async fn offline_actions_replay_in_order_once_the_daemon_returns() {
    let home = tempfile::tempdir().expect("tempdir");
    let socket = home.path().join("scribed.sock");
    let state_dir = home.path().join("state");

    // Seed a list while the daemon is up
    let daemon = TestDaemon::start_at(&socket, &state_dir).await;
    let backend = Arc::new(RemoteBackend::new(&socket));
    let list = backend
        .create_list(member(), "hh-1".into(), "Groceries")
        .await
        .expect("create list");
    daemon.stop().await;

    // Daemon gone; submissions fall into the durable queue
    let queue = Arc::new(
        OfflineQueue::open(&home.path().join("queue.jsonl"), SystemClock).expect("queue open"),
    );
    let replayer = Arc::new(Replayer::new(
        Arc::clone(&queue),
        Arc::clone(&backend) as Arc<dyn Backend>,
        member(),
    ));
    let client = SyncClient::new(
        Arc::clone(&backend) as Arc<dyn Backend>,
        Arc::clone(&queue),
        replayer,
        member(),
    );

    for (text, position) in [("Milk", 0), ("Eggs", 1), ("Bread", 2)] {
        let outcome = client.submit(add_item(&list.id, text, position)).await.expect("submit");
        assert!(matches!(outcome, SubmitOutcome::Queued(_)), "daemon is down: {outcome:?}");
    }
    assert_eq!(queue.len(), 3);

    // Daemon returns on the same state; connectivity signal drains the queue
    let daemon = TestDaemon::start_at(&socket, &state_dir).await;
    let outcome = client.set_online(true).await;
    assert_eq!(outcome, Some(ReplayOutcome::Completed { replayed: 3, rejected: 0 }));
    assert!(queue.is_empty());

    let items = backend.fetch_items(&list.id).await.expect("fetch items");
    let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, ["Milk", "Eggs", "Bread"]);
    daemon.stop().await;
}

#[tokio::test]
async fn change_feed_drives_reconciler_refetch() {
    let daemon = TestDaemon::start().await;
    let backend = Arc::new(RemoteBackend::new(&daemon.socket));
    let list =
        backend.create_list(member(), "hh-1".into(), "Groceries").await.expect("create list");

    // Subscribe narrowed to the one list this client renders
    let mut feed = daemon.connect().await;
    scribe_wire::write_request(
        &mut feed,
        &Request::Subscribe { household_id: "hh-1".into(), list_id: Some(list.id.clone()) },
    )
    .await
    .expect("subscribe");
    match scribe_wire::read_response(&mut feed).await.expect("handshake") {
        Response::Subscribed => {}
        other => panic!("expected handshake, got {other:?}"),
    }

    let reconciler =
        Reconciler::new(list.id.clone(), Arc::clone(&backend) as Arc<dyn Backend>);

    // Another household member adds an item
    backend.apply(member(), add_item(&list.id, "Milk", 0)).await.expect("apply");

    let change = match scribe_wire::read_response(&mut feed).await.expect("change frame") {
        Response::Change { change } => change,
        other => panic!("expected change, got {other:?}"),
    };
    assert_eq!(change.table, Table::ListItems);
    assert_eq!(change.op, ChangeOp::Insert);
    assert_eq!(change.list_id, Some(list.id.clone()));

    // The notification carries no data; the reconciler refetches
    assert!(reconciler.snapshot().is_empty());
    reconciler.on_change(&change).await.expect("refetch");
    let snapshot = reconciler.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].text, "Milk");
}

#[tokio::test]
async fn clear_after_print_cascades_through_the_feed() {
    let daemon = TestDaemon::start().await;
    let backend = Arc::new(RemoteBackend::new(&daemon.socket));

    let printer = match daemon
        .call(Request::RegisterPrinter { household_id: "hh-1".into(), name: "Kitchen".into() })
        .await
    {
        Response::PrinterRegistered { printer } => *printer,
        other => panic!("registration failed: {other:?}"),
    };
    let list =
        backend.create_list(member(), "hh-1".into(), "Groceries").await.expect("create list");
    backend.apply(member(), add_item(&list.id, "Milk", 0)).await.expect("apply");
    backend.apply(member(), add_item(&list.id, "Eggs", 1)).await.expect("apply");

    let producer =
        Producer::new(Arc::clone(&backend) as Arc<dyn Backend>, "hh-1".into(), member());
    let job_id = producer.print_list(&list.id, "Groceries", true).await.expect("print list");

    // The ticket carries the snapshot, not live rows
    let ticket = match daemon
        .call(Request::Poll { printer_id: printer.id.clone(), api_key: printer.api_key.clone() })
        .await
    {
        Response::Job { job: Some(ticket) } => ticket,
        other => panic!("expected ticket, got {other:?}"),
    };
    assert_eq!(ticket.id, job_id);
    assert!(ticket.clear_after_print);

    // Watch the household feed across the ack
    let mut feed = daemon.connect().await;
    scribe_wire::write_request(
        &mut feed,
        &Request::Subscribe { household_id: "hh-1".into(), list_id: None },
    )
    .await
    .expect("subscribe");
    let Response::Subscribed = scribe_wire::read_response(&mut feed).await.expect("handshake")
    else {
        panic!("expected handshake");
    };

    let response = daemon
        .call(Request::Ack { job_id, api_key: printer.api_key.clone(), status: "done".into() })
        .await;
    assert!(matches!(response, Response::Ok), "ack failed: {response:?}");

    // Job update, then the cascade delete, in commit order
    let first = match scribe_wire::read_response(&mut feed).await.expect("change") {
        Response::Change { change } => change,
        other => panic!("expected change, got {other:?}"),
    };
    assert_eq!((first.table, first.op), (Table::PrintJobs, ChangeOp::Update));

    let second = match scribe_wire::read_response(&mut feed).await.expect("change") {
        Response::Change { change } => change,
        other => panic!("expected change, got {other:?}"),
    };
    assert_eq!((second.table, second.op), (Table::ListItems, ChangeOp::Delete));
    assert_eq!(second.list_id, Some(list.id.clone()));

    // The list survives; its items are gone
    let items = backend.fetch_items(&list.id).await.expect("fetch items");
    assert!(items.is_empty());
}
