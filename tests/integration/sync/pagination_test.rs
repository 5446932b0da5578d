//! History pagination tests

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use chatsync::client::ChatSnapshot;
use chatsync::shared::SyncError;

use crate::common::*;

fn page(ids: &[(&str, i64)]) -> ChatSnapshot {
    ChatSnapshot {
        messages: ids.iter().map(|(id, sent_at)| msg(id, *sent_at)).collect(),
        session_id: Some("S1".to_string()),
        cursor: 5_000,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_empty_timeline_has_no_anchor() {
    let h = Harness::new().await;

    let added = h.sync.load_older().await.unwrap();

    assert_eq!(added, 0);
    assert!(h.transport.calls().is_empty());
    assert!(!h.sync.status().is_loading());
}

#[tokio::test]
async fn test_older_page_is_prepended() {
    let h = Harness::with_persisted(Some(page(&[("m3", 300), ("m4", 400)]))).await;
    h.transport.set_older("m3", vec![msg("m2", 200), msg("m1", 100)]);

    let added = h.sync.load_older().await.unwrap();

    assert_eq!(added, 2);
    assert_eq!(h.transport.last_arg(Endpoint::OlderMessages).as_deref(), Some("m3"));
    let snapshot = h.sync.snapshot();
    assert_eq!(ids(&snapshot.messages), vec!["m1", "m2", "m3", "m4"]);
    assert_eq!(snapshot.cursor, 5_000);
}

#[tokio::test]
async fn test_known_ids_are_dropped() {
    let h = Harness::with_persisted(Some(page(&[("m3", 300), ("m4", 400)]))).await;
    h.transport
        .set_older("m3", vec![msg("m2", 200), edited("m3", 300, 900, "server copy")]);

    let added = h.sync.load_older().await.unwrap();

    assert_eq!(added, 1);
    let snapshot = h.sync.snapshot();
    assert_eq!(ids(&snapshot.messages), vec!["m2", "m3", "m4"]);
    assert_eq!(snapshot.message("m3").unwrap().body(), "text m3");
    assert_timeline(&snapshot.messages);
}

#[tokio::test]
async fn test_start_of_history() {
    let h = Harness::with_persisted(Some(page(&[("m1", 100)]))).await;
    let saves = h.persistence.save_count();

    assert_eq!(h.sync.load_older().await.unwrap(), 0);
    assert_eq!(h.persistence.save_count(), saves);
}

#[tokio::test]
async fn test_pages_walk_backwards() {
    let h = Harness::with_persisted(Some(page(&[("m5", 500)]))).await;
    h.transport.set_older("m5", vec![msg("m4", 400), msg("m3", 300)]);
    h.transport.set_older("m3", vec![msg("m2", 200)]);

    h.sync.load_older().await.unwrap();
    h.sync.load_older().await.unwrap();

    assert_eq!(h.transport.last_arg(Endpoint::OlderMessages).as_deref(), Some("m3"));
    assert_eq!(ids(&h.sync.snapshot().messages), vec!["m2", "m3", "m4", "m5"]);
}

#[tokio::test]
async fn test_failure_sets_error_slot() {
    let h = Harness::with_persisted(Some(page(&[("m3", 300)]))).await;
    h.transport.fail(Endpoint::OlderMessages);
    let before = h.sync.snapshot();

    let result = h.sync.load_older().await;

    assert_matches!(result, Err(SyncError::Transport(_)));
    assert_eq!(*h.sync.snapshot(), *before);
    assert!(h.sync.status().last_error.is_some());
}
