//! Shared Error Types
//!
//! Error types for the synchronization client, one per collaborator boundary.
//!
//! # Error Categories
//!
//! - `TransportError` - the remote API could not be reached or answered badly
//! - `StorageError` - the persisted snapshot could not be read or written
//! - `SyncError` - what an orchestrator operation reports to its caller
//!
//! Transport errors are recoverable: the store keeps its committed state and the
//! message is surfaced through the status slot. Storage errors are logged and
//! never surfaced to the user.
use thiserror::Error;

/// Failure talking to the remote chat API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, timeout or I/O failure
    #[error("Network error: {message}")]
    Network {
        /// Human-readable error message
        message: String,
    },

    /// Server answered with a non-success status
    #[error("HTTP error {status} from {endpoint}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Request path that failed
        endpoint: String,
    },

    /// Response body did not match the expected shape
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode {
        /// Request path whose body was malformed
        endpoint: String,
        /// Human-readable error message
        message: String,
    },
}

impl TransportError {
    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new status error
    pub fn status(status: u16, endpoint: impl Into<String>) -> Self {
        Self::Status {
            status,
            endpoint: endpoint.into(),
        }
    }

    /// Create a new decode error
    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

/// Failure reading or writing the persisted snapshot
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error reported by a synchronization operation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The remote call failed; committed state is unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Outbound text was blank after trimming
    #[error("Message text cannot be empty")]
    EmptyMessage,
}
