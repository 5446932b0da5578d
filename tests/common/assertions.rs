//! Invariant assertions
//!
//! Checks with descriptive failure output for the store invariants.

use std::collections::HashSet;

use chatsync::shared::Message;

/// Assert the timeline is ordered by send time and unique by ID
pub fn assert_timeline(messages: &[Message]) {
    for pair in messages.windows(2) {
        assert!(
            pair[0].sent_at <= pair[1].sent_at,
            "Timeline out of order: {} (sent {}) before {} (sent {})",
            pair[0].id,
            pair[0].sent_at,
            pair[1].id,
            pair[1].sent_at
        );
    }
    let mut seen = HashSet::new();
    for message in messages {
        assert!(seen.insert(&message.id), "Duplicate message id {}", message.id);
    }
}

/// Assert no message in the timeline has the given body text
pub fn assert_no_text(messages: &[Message], text: &str) {
    if let Some(found) = messages.iter().find(|m| m.body() == text) {
        panic!("Expected no message with text {:?}, found {}", text, found.id);
    }
}
