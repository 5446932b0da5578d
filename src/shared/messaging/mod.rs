//! Messaging types
//!
//! Wire-level records served by the chat API: messages, participants and the
//! session marker, plus the identity traits the merge engine works over.

pub mod message;
pub mod participant;

pub use message::{Attachment, AttachmentKind, Message, QuotedMessage, Reaction};
pub use participant::Participant;

use serde::{Deserialize, Serialize};

/// A record with a stable identity and a modification time
pub trait Entity {
    /// Unique ID of the record
    fn entity_id(&self) -> &str;

    /// Last modification time (ms since epoch)
    fn updated_at(&self) -> i64;
}

/// A record that has a place on the timeline
pub trait Chronological: Entity {
    /// Logical send time (ms since epoch)
    fn sent_at(&self) -> i64;
}

/// Server session marker.
///
/// A new `session_id` means the remote store was reset and local state from the
/// previous epoch must not be merged with the new one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(rename = "sessionUuid")]
    pub session_id: String,
    pub api_version: u32,
}
