//! chatsync - Chat Synchronization Library
//!
//! Client-side synchronization layer for a polling chat service. It fetches
//! messages and participant records, merges incremental updates into local
//! state, pages backwards into history, and reconciles an offline-cached
//! snapshot with the live server session.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types, configuration and error types
//!   - Message, Participant and session marker structures
//!   - `AppConfig` builder and validation
//!   - Transport, storage and sync errors
//!
//! - **`client`** - The synchronization engine
//!   - Entity store with change subscription
//!   - Merge engine (replace-by-id, pagination, sent messages)
//!   - Session reconciler and sync orchestrator
//!   - reqwest transport and SQLite snapshot persistence
//!
//! # Usage
//!
//! ```rust,no_run
//! use chatsync::client::{ChatApi, ChatSync, Config, MemoryStore, SystemClock};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sync = ChatSync::open(
//!     Arc::new(ChatApi::new(Config::new())?),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(SystemClock),
//! )
//! .await;
//!
//! sync.bootstrap().await?;
//! sync.refresh().await?;
//! sync.load_older().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Consistency guarantees
//!
//! - The timeline is unique by message ID and ordered by send time after
//!   every operation.
//! - A failed fetch never changes committed state.
//! - The synchronization cursor only moves forward, and only past data that
//!   has been merged.
//!
//! # Thread Safety
//!
//! All state is swapped atomically through `tokio::sync::watch`; no lock is
//! held across an await point. `ChatSync` is `Send + Sync` and is shared with
//! the refresh scheduler through an `Arc`.

/// Shared types and data structures
pub mod shared;

/// Synchronization client
pub mod client;
