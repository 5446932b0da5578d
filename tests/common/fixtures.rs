//! Test fixtures
//!
//! Builders for messages, participants and a fully wired `ChatSync`.

use std::sync::Arc;

use chatsync::client::{ChatSnapshot, ChatSync, ManualClock, MemoryStore};
use chatsync::shared::{Message, Participant};

use super::mock_transport::ScriptedTransport;

/// Clock value the harness starts at
pub const NOW: i64 = 10_000;

/// Plain message from participant `p1`
pub fn msg(id: &str, sent_at: i64) -> Message {
    Message::new(id, "p1", format!("text {}", id), sent_at)
}

/// Edited copy of a message
pub fn edited(id: &str, sent_at: i64, updated_at: i64, text: &str) -> Message {
    let mut message = Message::new(id, "p1", text, sent_at);
    message.updated_at = updated_at;
    message.is_edited = true;
    message
}

pub fn participant(id: &str, name: &str) -> Participant {
    Participant::new(id, name, 1)
}

/// IDs of a timeline, in order
pub fn ids(messages: &[Message]) -> Vec<String> {
    messages.iter().map(|m| m.id.clone()).collect()
}

/// Everything a sync test needs to drive and observe `ChatSync`
pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub persistence: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub sync: ChatSync,
}

impl Harness {
    /// Fresh client with nothing persisted
    pub async fn new() -> Self {
        Self::with_persisted(None).await
    }

    /// Client restored from `snapshot`, as if a previous run had saved it
    pub async fn with_persisted(snapshot: Option<ChatSnapshot>) -> Self {
        let transport = Arc::new(ScriptedTransport::default());
        let persistence = Arc::new(match snapshot {
            Some(snapshot) => MemoryStore::with_snapshot(snapshot),
            None => MemoryStore::new(),
        });
        let clock = Arc::new(ManualClock::new(NOW));
        let sync = ChatSync::open(transport.clone(), persistence.clone(), clock.clone()).await;
        Self {
            transport,
            persistence,
            clock,
            sync,
        }
    }
}
