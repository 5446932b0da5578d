//! Chat Message Data Structure
//!
//! Represents a message in the chat timeline as served by the remote API.
//!
//! A message may quote another message. The quoted copy is embedded by value,
//! but only one level deep: [`QuotedMessage`] carries no reply of its own, so a
//! nested `replyToMessage` in incoming JSON is dropped during decoding.

use serde::{Deserialize, Serialize};

use super::{Chronological, Entity};

/// Kind of attachment. The remote API only serves images today.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Inline image
    Image,
}

/// Media attached to a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// Unique attachment ID
    #[serde(rename = "uuid")]
    pub id: String,
    /// Attachment kind tag
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    /// Source locator
    pub url: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// A single emoji reaction by one participant.
///
/// Two participants reacting with the same emoji are two reactions; grouping
/// them for display is left to the view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    /// Unique reaction ID
    #[serde(rename = "uuid")]
    pub id: String,
    /// Participant who reacted
    #[serde(rename = "participantUuid")]
    pub participant_id: String,
    /// Emoji value
    pub value: String,
}

/// Represents a chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message ID
    #[serde(rename = "uuid")]
    pub id: String,
    /// Participant who sent the message
    #[serde(rename = "authorUuid")]
    pub author_id: String,
    /// Body text. May be absent when the attachments carry the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Ordered attachments
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Ordered reactions
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    /// Snapshot of the message this one replies to
    #[serde(
        default,
        rename = "replyToMessage",
        skip_serializing_if = "Option::is_none"
    )]
    pub reply_to: Option<Box<QuotedMessage>>,
    /// Logical send time (ms since epoch), used for ordering
    pub sent_at: i64,
    /// Last modification time (ms since epoch)
    pub updated_at: i64,
    /// Whether the author edited the message after sending
    #[serde(default)]
    pub is_edited: bool,
}

/// A message embedded inside a reply.
///
/// Same fields as [`Message`] minus the reply reference, which bounds the
/// recursion at depth one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuotedMessage {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "authorUuid")]
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    pub sent_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub is_edited: bool,
}

impl Message {
    /// Create a plain text message
    pub fn new(
        id: impl Into<String>,
        author_id: impl Into<String>,
        text: impl Into<String>,
        sent_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            text: Some(text.into()),
            attachments: Vec::new(),
            reactions: Vec::new(),
            reply_to: None,
            sent_at,
            updated_at: sent_at,
            is_edited: false,
        }
    }

    /// Body text, or the empty string for attachment-only messages
    pub fn body(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Set the quoted message, truncating it to a single level
    pub fn with_reply_to(mut self, original: &Message) -> Self {
        self.reply_to = Some(Box::new(QuotedMessage::from(original)));
        self
    }
}

impl From<&Message> for QuotedMessage {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            author_id: message.author_id.clone(),
            text: message.text.clone(),
            attachments: message.attachments.clone(),
            reactions: message.reactions.clone(),
            sent_at: message.sent_at,
            updated_at: message.updated_at,
            is_edited: message.is_edited,
        }
    }
}

impl Entity for Message {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }
}

impl Chronological for Message {
    fn sent_at(&self) -> i64 {
        self.sent_at
    }
}
