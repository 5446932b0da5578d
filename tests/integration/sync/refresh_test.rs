//! Refresh tests
//!
//! Incremental pulls: edits replace in place, failures leave the cursor and
//! store alone, and an empty pull commits nothing.

use std::sync::Arc;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use chatsync::client::ChatSnapshot;
use chatsync::shared::SyncError;

use crate::common::*;

fn synced() -> ChatSnapshot {
    ChatSnapshot {
        messages: vec![msg("m1", 100), msg("m2", 200), msg("m3", 300)],
        participants: vec![participant("p1", "Ada")],
        session_id: Some("S1".to_string()),
        cursor: 5_000,
    }
}

#[tokio::test]
async fn test_edit_replaces_message_in_place() {
    let h = Harness::with_persisted(Some(synced())).await;
    h.transport
        .set_message_updates(vec![edited("m2", 200, 6_000, "fixed typo")]);

    let count = h.sync.refresh().await.unwrap();

    assert_eq!(count, 1);
    let snapshot = h.sync.snapshot();
    assert_eq!(ids(&snapshot.messages), vec!["m1", "m2", "m3"]);
    let m2 = snapshot.message("m2").unwrap();
    assert_eq!(m2.body(), "fixed typo");
    assert!(m2.is_edited);
    assert_eq!(snapshot.cursor, NOW);
    assert_eq!(h.transport.last_arg(Endpoint::MessageUpdates).as_deref(), Some("5000"));
    assert_eq!(h.transport.last_arg(Endpoint::ParticipantUpdates).as_deref(), Some("5000"));
}

#[tokio::test]
async fn test_new_messages_and_participants_merge_in_one_commit() {
    let h = Harness::with_persisted(Some(synced())).await;
    h.transport.set_message_updates(vec![msg("m4", 400), msg("m0", 50)]);
    h.transport
        .set_participant_updates(vec![participant("p1", "Ada L."), participant("p2", "Grace")]);
    let mut updates = h.sync.subscribe();
    updates.borrow_and_update();

    h.sync.refresh().await.unwrap();

    assert!(updates.has_changed().unwrap());
    updates.borrow_and_update();
    assert!(!updates.has_changed().unwrap());

    let snapshot = h.sync.snapshot();
    assert_eq!(ids(&snapshot.messages), vec!["m0", "m1", "m2", "m3", "m4"]);
    assert_eq!(snapshot.participant("p1").unwrap().name, "Ada L.");
    assert_eq!(snapshot.participants.len(), 2);
    assert_timeline(&snapshot.messages);
}

#[tokio::test]
async fn test_failure_leaves_store_and_cursor() {
    let h = Harness::with_persisted(Some(synced())).await;
    h.transport.set_message_updates(vec![msg("m4", 400)]);
    h.transport.fail(Endpoint::ParticipantUpdates);
    let before = h.sync.snapshot();

    let result = h.sync.refresh().await;

    assert_matches!(result, Err(SyncError::Transport(_)));
    assert!(Arc::ptr_eq(&before, &h.sync.snapshot()));
    assert!(h.sync.status().last_error.is_some());

    // The next attempt asks for the same window
    h.transport.recover(Endpoint::ParticipantUpdates);
    h.clock.advance(1_000);
    h.sync.refresh().await.unwrap();
    assert_eq!(h.transport.last_arg(Endpoint::MessageUpdates).as_deref(), Some("5000"));
    assert_eq!(h.sync.snapshot().cursor, NOW + 1_000);
    assert!(h.sync.snapshot().message("m4").is_some());
}

#[tokio::test]
async fn test_repeated_refresh_is_idempotent() {
    let h = Harness::with_persisted(Some(synced())).await;
    h.transport
        .set_message_updates(vec![edited("m1", 100, 6_000, "edited"), msg("m4", 400)]);

    h.sync.refresh().await.unwrap();
    let first = h.sync.snapshot();
    h.sync.refresh().await.unwrap();
    let second = h.sync.snapshot();

    assert_eq!(first.messages, second.messages);
    assert_eq!(first.participants, second.participants);
}

#[tokio::test]
async fn test_empty_pull_commits_nothing() {
    let h = Harness::with_persisted(Some(synced())).await;
    let before = h.sync.snapshot();
    let saves = h.persistence.save_count();
    let updates = h.sync.subscribe();

    let count = h.sync.refresh().await.unwrap();

    assert_eq!(count, 0);
    assert!(Arc::ptr_eq(&before, &h.sync.snapshot()));
    assert!(!updates.has_changed().unwrap());
    assert_eq!(h.persistence.save_count(), saves);
}

#[tokio::test]
async fn test_unsynced_client_pulls_everything() {
    let h = Harness::new().await;
    h.transport.set_all_messages(vec![msg("m2", 200), msg("m1", 100)]);
    h.transport.set_participants(vec![participant("p1", "Ada")]);

    let count = h.sync.refresh().await.unwrap();

    assert_eq!(count, 3);
    assert_eq!(h.transport.count(Endpoint::AllMessages), 1);
    assert_eq!(h.transport.count(Endpoint::MessageUpdates), 0);
    assert_eq!(h.transport.count(Endpoint::AllParticipants), 1);
    assert_eq!(ids(&h.sync.snapshot().messages), vec!["m1", "m2"]);
    assert_eq!(h.sync.snapshot().cursor, NOW);
}

#[tokio::test]
async fn test_stale_update_is_still_applied() {
    let mut snapshot = synced();
    snapshot.messages[0] = edited("m1", 100, 8_000, "newer local copy");
    let h = Harness::with_persisted(Some(snapshot)).await;
    h.transport
        .set_message_updates(vec![edited("m1", 100, 7_000, "older server copy")]);

    h.sync.refresh().await.unwrap();

    assert_eq!(h.sync.snapshot().message("m1").unwrap().body(), "older server copy");
}

#[tokio::test]
async fn test_refresh_persists_result() {
    let h = Harness::with_persisted(Some(synced())).await;
    h.transport.set_message_updates(vec![msg("m4", 400)]);

    h.sync.refresh().await.unwrap();

    let saved = h.persistence.saved().await.unwrap();
    assert_eq!(saved.cursor, NOW);
    assert!(saved.message("m4").is_some());
}
