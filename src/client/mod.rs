//! Chat Synchronization Client Module
//!
//! Fetches messages and participants from the remote chat service, merges
//! incremental updates into one consistent in-memory timeline, pages into
//! history, and keeps an offline copy of the result.
//!
//! # Architecture
//!
//! The client module is organized into focused submodules, leaves first:
//!
//! - **`store`** - Entity Store: the current snapshot and its subscribers
//! - **`merge`** - Merge Engine: pure reconciliation of fetched batches
//! - **`reconcile`** - Session Reconciler: discards state from an old server epoch
//! - **`sync`** - Sync Orchestrator: bootstrap, refresh, pagination, send
//! - **`api`** - HTTP transport for the remote chat service
//! - **`local_db`** - persisted snapshot (SQLite or memory)
//! - **`config`** - runtime configuration
//! - **`clock`** - time source for the cursor
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs        - Module exports and documentation
//! ├── main.rs       - Headless binary entry point
//! ├── api.rs        - ChatTransport trait and reqwest client
//! ├── clock.rs      - Clock trait
//! ├── config.rs     - Configuration management
//! ├── merge.rs      - Merge engine
//! ├── reconcile.rs  - Session reconciler
//! ├── store.rs      - Entity store
//! ├── local_db/     - Snapshot persistence
//! └── sync/         - Orchestrator and refresh scheduler
//! ```

pub mod api;
pub mod clock;
pub mod config;
pub mod local_db;
pub mod merge;
pub mod reconcile;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use api::{ChatApi, ChatTransport};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use local_db::{LocalDatabase, MemoryStore, SnapshotStore};
pub use reconcile::{ReconciliationResult, SessionReconciler};
pub use store::{ChatSnapshot, EntityStore};
pub use sync::{BootstrapReport, ChatSync, RefreshScheduler, SyncStatus};
