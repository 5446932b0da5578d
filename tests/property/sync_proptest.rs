//! Property-based tests for the sync orchestrator
//!
//! Arbitrary update batches pushed through `refresh` keep the timeline valid,
//! repeat pulls are idempotent, and the cursor never regresses.

use proptest::prelude::*;

use chatsync::client::merge::is_timeline;
use chatsync::shared::Message;

use crate::common::*;

fn batch() -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec((0u8..15, 0i64..100), 0..20).prop_map(|raw| {
        raw.into_iter()
            .map(|(id, sent_at)| msg(&format!("m{}", id), sent_at))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_refresh_keeps_timeline_and_is_idempotent(first in batch(), second in batch()) {
        tokio_test::block_on(async {
            let h = Harness::new().await;

            h.transport.set_all_messages(first);
            h.sync.refresh().await.unwrap();
            assert!(is_timeline(&h.sync.snapshot().messages));

            h.transport.set_message_updates(second);
            h.clock.advance(100);
            h.sync.refresh().await.unwrap();
            let once = h.sync.snapshot();
            assert!(is_timeline(&once.messages));

            h.sync.refresh().await.unwrap();
            let twice = h.sync.snapshot();
            assert_eq!(once.messages, twice.messages);
        });
    }

    #[test]
    fn test_cursor_never_regresses(steps in prop::collection::vec(-500i64..500, 1..10)) {
        tokio_test::block_on(async {
            let h = Harness::new().await;
            h.transport.set_all_messages(vec![msg("m1", 1)]);
            h.transport.set_message_updates(vec![msg("m1", 1)]);

            let mut highest = 0;
            for step in steps {
                h.clock.advance(step);
                h.sync.refresh().await.unwrap();
                let cursor = h.sync.snapshot().cursor;
                assert!(cursor >= highest);
                highest = cursor;
            }
        });
    }
}
