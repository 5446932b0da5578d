//! Shared Module
//!
//! Types and data structures that describe the remote chat API and the
//! client's own configuration and errors. Nothing here performs I/O.

/// Messaging types (messages, participants, session marker)
pub mod messaging;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use messaging::{
    Attachment, AttachmentKind, Chronological, Entity, Message, Participant, QuotedMessage,
    Reaction, SessionInfo,
};
pub use error::{StorageError, SyncError, TransportError};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
