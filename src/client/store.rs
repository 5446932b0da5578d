//! # Entity Store
//!
//! Holds the canonical chat state: the ordered message timeline, the
//! participant collection, the session marker and the synchronization cursor.
//!
//! The four fields live together in one immutable [`ChatSnapshot`] behind a
//! `tokio::sync::watch` channel. Every mutation builds a new snapshot and swaps
//! it in as a unit, so readers never observe a half-applied merge, and every
//! committed swap wakes the subscribers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatsync::client::store::{ChatSnapshot, EntityStore};
//!
//! let store = EntityStore::new(ChatSnapshot::default());
//! let _updates = store.subscribe();
//!
//! store.clear();
//! let current = store.snapshot();
//! assert!(current.messages.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use crate::client::merge;
use crate::shared::messaging::{Message, Participant};

/// Full chat state as persisted and observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    /// Timeline ordered by `sent_at`, unique by ID
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Known participants, unique by ID
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Session marker the state belongs to
    #[serde(default, rename = "sessionUuid")]
    pub session_id: Option<String>,
    /// Time up to which all remote updates are held (ms since epoch, 0 = never)
    #[serde(default, rename = "lastUpdateTime")]
    pub cursor: i64,
}

impl ChatSnapshot {
    /// Oldest message on the timeline; the anchor for backward pagination
    pub fn oldest(&self) -> Option<&Message> {
        self.messages.first()
    }

    /// Newest message on the timeline
    pub fn newest(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Look up a message by ID
    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }

    /// Look up a participant by ID
    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|participant| participant.id == id)
    }

    /// Re-establish the store invariants on data of unknown provenance, such
    /// as a snapshot read back from disk.
    pub fn normalized(self) -> Self {
        Self {
            messages: merge::merge_updates(&[], &self.messages),
            participants: merge::merge_by_id(&[], &self.participants),
            session_id: self.session_id,
            cursor: self.cursor.max(0),
        }
    }
}

/// Observable holder of the current [`ChatSnapshot`]
#[derive(Debug)]
pub struct EntityStore {
    state: watch::Sender<Arc<ChatSnapshot>>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(ChatSnapshot::default())
    }
}

impl EntityStore {
    /// Create a store seeded with `initial`
    pub fn new(initial: ChatSnapshot) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        Self { state }
    }

    /// Current snapshot. Cheap; shares the committed value.
    pub fn snapshot(&self) -> Arc<ChatSnapshot> {
        self.state.borrow().clone()
    }

    /// Receiver notified after every committed change
    pub fn subscribe(&self) -> watch::Receiver<Arc<ChatSnapshot>> {
        self.state.subscribe()
    }

    /// Atomically replace the snapshot with the one `f` derives from the
    /// current value. Returning `None` leaves the store (and the identity of
    /// its `Arc`) untouched and notifies nobody.
    ///
    /// Returns whether a new snapshot was committed.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&ChatSnapshot) -> Option<ChatSnapshot>,
    {
        self.state.send_if_modified(|current| match f(current) {
            Some(next) => {
                debug_assert!(
                    merge::is_timeline(&next.messages),
                    "timeline must stay unique and ordered"
                );
                *current = Arc::new(next);
                true
            }
            None => false,
        })
    }

    /// Reset messages, participants, session marker and cursor in one step
    pub fn clear(&self) {
        self.state.send_replace(Arc::new(ChatSnapshot::default()));
    }
}
