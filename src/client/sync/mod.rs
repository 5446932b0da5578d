//! # Sync Orchestrator
//!
//! Sequences the calls against the remote chat service and folds their results
//! into the [`EntityStore`] through the merge engine.
//!
//! ## Operations
//!
//! - **bootstrap**: session check, then the latest message page and the
//!   participant set fetched concurrently, each merged on its own
//! - **refresh**: everything changed since the cursor, merged in one commit
//! - **load_older**: the page before the oldest held message
//! - **send**: post text, merge the server-confirmed record
//!
//! Every operation goes `Idle -> Loading -> Idle`. A failed fetch leaves the
//! store exactly as it was and records the error in the [`SyncStatus`] slot,
//! where it stays until [`ChatSync::acknowledge_error`] is called.
//!
//! ## Cursor discipline
//!
//! The cursor is sampled from the clock before the fetch it covers is issued
//! and committed only together with, or after, the merge of that fetch. It
//! never moves backwards. A crash between merge and cursor advance therefore
//! re-requests a window instead of skipping one; merges are replace-by-id, so
//! the repeat is harmless.
//!
//! ## Persistence
//!
//! The snapshot is saved after every committed mutation. Save failures are
//! logged and otherwise ignored.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatsync::client::{ChatApi, ChatSync, Config, LocalDatabase, SystemClock};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new();
//! let db = LocalDatabase::open(config.database_path(), config.storage_key()).await?;
//! let sync = ChatSync::open(
//!     Arc::new(ChatApi::new(config)?),
//!     Arc::new(db),
//!     Arc::new(SystemClock),
//! )
//! .await;
//!
//! sync.bootstrap().await?;
//! sync.send("Hello!").await?;
//! println!("{} messages", sync.snapshot().messages.len());
//! # Ok(())
//! # }
//! ```

pub mod scheduler;

pub use scheduler::RefreshScheduler;

use futures_util::future::join;
use std::sync::Arc;
use tokio::sync::watch;

use crate::client::api::ChatTransport;
use crate::client::clock::Clock;
use crate::client::local_db::SnapshotStore;
use crate::client::merge;
use crate::client::reconcile::{ReconciliationResult, SessionReconciler};
use crate::client::store::{ChatSnapshot, EntityStore};
use crate::shared::error::{SyncError, TransportError};
use crate::shared::messaging::{Message, Participant};

/// View-facing progress and error state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatus {
    /// Operations currently awaiting the network
    pub in_flight: usize,
    /// Last user-visible failure, kept until acknowledged
    pub last_error: Option<String>,
}

impl SyncStatus {
    /// Whether any operation is in progress
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// What a bootstrap did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Outcome of the session check
    pub session: ReconciliationResult,
    /// Messages in the latest page
    pub messages: usize,
    /// Participant records received
    pub participants: usize,
}

/// Marks an operation as in flight for as long as it lives
struct LoadingGuard<'a> {
    status: &'a watch::Sender<SyncStatus>,
}

impl<'a> LoadingGuard<'a> {
    fn new(status: &'a watch::Sender<SyncStatus>) -> Self {
        status.send_modify(|status| status.in_flight += 1);
        Self { status }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.status
            .send_modify(|status| status.in_flight = status.in_flight.saturating_sub(1));
    }
}

/// Main synchronization coordinator
pub struct ChatSync {
    transport: Arc<dyn ChatTransport>,
    persistence: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    store: EntityStore,
    reconciler: SessionReconciler,
    status: watch::Sender<SyncStatus>,
}

impl std::fmt::Debug for ChatSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSync")
            .field("store", &self.store)
            .field("status", &*self.status.borrow())
            .finish_non_exhaustive()
    }
}

impl ChatSync {
    /// Create a coordinator over an explicit initial snapshot
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        persistence: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        initial: ChatSnapshot,
    ) -> Self {
        let (status, _) = watch::channel(SyncStatus::default());
        Self {
            transport,
            persistence,
            clock,
            store: EntityStore::new(initial),
            reconciler: SessionReconciler::new(),
            status,
        }
    }

    /// Create a coordinator seeded from the persisted snapshot.
    ///
    /// A missing or unreadable snapshot starts the client empty.
    pub async fn open(
        transport: Arc<dyn ChatTransport>,
        persistence: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let initial = match persistence.load().await {
            Ok(Some(snapshot)) => {
                let snapshot = snapshot.normalized();
                tracing::info!(
                    "Restored {} messages and {} participants (cursor {})",
                    snapshot.messages.len(),
                    snapshot.participants.len(),
                    snapshot.cursor
                );
                snapshot
            }
            Ok(None) => ChatSnapshot::default(),
            Err(e) => {
                tracing::warn!("Failed to restore chat snapshot, starting empty: {}", e);
                ChatSnapshot::default()
            }
        };
        Self::new(transport, persistence, clock, initial)
    }

    /// The underlying entity store
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Current chat state
    pub fn snapshot(&self) -> Arc<ChatSnapshot> {
        self.store.snapshot()
    }

    /// Receiver notified after every committed state change
    pub fn subscribe(&self) -> watch::Receiver<Arc<ChatSnapshot>> {
        self.store.subscribe()
    }

    /// Current loading flag and error slot
    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Receiver notified when the loading flag or error slot changes
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Clear the error slot once the user has seen it
    pub fn acknowledge_error(&self) {
        self.status.send_if_modified(|status| status.last_error.take().is_some());
    }

    /// Session check followed by the initial load.
    ///
    /// Message page and participants are fetched concurrently and merged
    /// independently; one failing does not undo the other. The cursor only
    /// advances when both succeeded.
    pub async fn bootstrap(&self) -> Result<BootstrapReport, SyncError> {
        let _loading = LoadingGuard::new(&self.status);

        let info = self
            .transport
            .get_session_info()
            .await
            .map_err(|e| self.fail("bootstrap", e))?;
        tracing::debug!(
            "Server session {} (API v{})",
            info.session_id,
            info.api_version
        );

        let session = self.reconciler.reconcile(&self.store, &info);
        if session.is_reset() {
            if let Err(e) = self.persistence.clear().await {
                tracing::warn!("Failed to clear persisted chat snapshot: {}", e);
            }
        }
        self.persist().await;

        let cursor = self.store.snapshot().cursor;
        let now = self.clock.now_millis();
        let (messages, participants) =
            join(self.load_latest(), self.load_participants(cursor)).await;

        if messages.is_ok() && participants.is_ok() {
            self.advance_cursor(now).await;
        }

        match (messages, participants) {
            (Ok(messages), Ok(participants)) => {
                tracing::info!(
                    "Bootstrap complete: {} messages, {} participants",
                    messages,
                    participants
                );
                Ok(BootstrapReport {
                    session,
                    messages,
                    participants,
                })
            }
            (Err(e), _) | (_, Err(e)) => Err(self.fail("bootstrap", e)),
        }
    }

    /// Pull everything changed since the cursor.
    ///
    /// A cursor of zero means nothing was ever synchronized, so the full
    /// message and participant sets are requested instead. Both fetches must
    /// succeed before anything is merged; on failure the cursor stays put and
    /// the next refresh asks for the same window.
    ///
    /// Returns the number of records received.
    pub async fn refresh(&self) -> Result<usize, SyncError> {
        let _loading = LoadingGuard::new(&self.status);

        let cursor = self.store.snapshot().cursor;
        let now = self.clock.now_millis();

        let (messages, participants) = self
            .fetch_changes(cursor)
            .await
            .map_err(|e| self.fail("refresh", e))?;

        if messages.is_empty() && participants.is_empty() {
            tracing::debug!("No updates since {}", cursor);
            return Ok(0);
        }

        self.store.update(|current| {
            warn_stale("message", &current.messages, &messages);
            warn_stale("participant", &current.participants, &participants);
            Some(ChatSnapshot {
                messages: merge::merge_updates(&current.messages, &messages),
                participants: merge::merge_by_id(&current.participants, &participants),
                session_id: current.session_id.clone(),
                cursor: current.cursor.max(now),
            })
        });
        tracing::debug!(
            "Merged {} message and {} participant updates, cursor now {}",
            messages.len(),
            participants.len(),
            self.store.snapshot().cursor
        );
        self.persist().await;

        Ok(messages.len() + participants.len())
    }

    /// Fetch and prepend the page before the oldest held message.
    ///
    /// With an empty timeline there is no anchor: nothing is fetched and
    /// `Ok(0)` is returned. Returns the number of messages added; zero once
    /// the start of history is reached.
    pub async fn load_older(&self) -> Result<usize, SyncError> {
        let anchor = match self.store.snapshot().oldest() {
            Some(oldest) => oldest.id.clone(),
            None => return Ok(0),
        };
        let _loading = LoadingGuard::new(&self.status);

        let older = self
            .transport
            .get_older_messages(&anchor)
            .await
            .map_err(|e| self.fail("load older", e))?;
        if older.is_empty() {
            tracing::debug!("No messages older than {}", anchor);
            return Ok(0);
        }

        let mut added = 0;
        self.store.update(|current| {
            let messages = merge::prepend_older(&current.messages, &older);
            added = messages.len() - current.messages.len();
            (added > 0).then(|| ChatSnapshot {
                messages,
                ..current.clone()
            })
        });
        if added < older.len() {
            tracing::warn!(
                "Dropped {} already known messages from older page before {}",
                older.len() - added,
                anchor
            );
        }
        if added > 0 {
            self.persist().await;
        }
        Ok(added)
    }

    /// Send `text` and merge the server-confirmed message.
    ///
    /// Nothing is added to the store before the server confirms. On failure
    /// the store is untouched and the caller still owns the draft text.
    pub async fn send(&self, text: &str) -> Result<Message, SyncError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SyncError::EmptyMessage);
        }
        let _loading = LoadingGuard::new(&self.status);

        let sent = self
            .transport
            .send_message(text)
            .await
            .map_err(|e| self.fail("send", e))?;

        self.store.update(|current| {
            Some(ChatSnapshot {
                messages: merge::append_sent(&current.messages, &sent),
                ..current.clone()
            })
        });
        self.persist().await;
        Ok(sent)
    }

    /// Discard all local state, persisted copy included
    pub async fn clear(&self) {
        self.store.clear();
        self.status.send_if_modified(|status| status.last_error.take().is_some());
        if let Err(e) = self.persistence.clear().await {
            tracing::warn!("Failed to clear persisted chat snapshot: {}", e);
        }
    }

    async fn load_latest(&self) -> Result<usize, TransportError> {
        let latest = self.transport.get_latest_messages().await?;
        if !latest.is_empty() {
            self.store.update(|current| {
                warn_stale("message", &current.messages, &latest);
                Some(ChatSnapshot {
                    messages: merge::merge_updates(&current.messages, &latest),
                    ..current.clone()
                })
            });
            self.persist().await;
        }
        Ok(latest.len())
    }

    async fn load_participants(&self, cursor: i64) -> Result<usize, TransportError> {
        let participants = self.fetch_participants(cursor).await?;
        if !participants.is_empty() {
            self.store.update(|current| {
                warn_stale("participant", &current.participants, &participants);
                Some(ChatSnapshot {
                    participants: merge::merge_by_id(&current.participants, &participants),
                    ..current.clone()
                })
            });
            self.persist().await;
        }
        Ok(participants.len())
    }

    async fn fetch_participants(&self, cursor: i64) -> Result<Vec<Participant>, TransportError> {
        if cursor == 0 {
            self.transport.get_all_participants().await
        } else {
            self.transport.get_participant_updates_since(cursor).await
        }
    }

    async fn fetch_changes(
        &self,
        cursor: i64,
    ) -> Result<(Vec<Message>, Vec<Participant>), TransportError> {
        let messages = if cursor == 0 {
            self.transport.get_all_messages().await?
        } else {
            self.transport.get_message_updates_since(cursor).await?
        };
        let participants = self.fetch_participants(cursor).await?;
        Ok((messages, participants))
    }

    async fn advance_cursor(&self, now: i64) {
        let advanced = self.store.update(|current| {
            (now > current.cursor).then(|| ChatSnapshot {
                cursor: now,
                ..current.clone()
            })
        });
        if advanced {
            tracing::debug!("Cursor advanced to {}", now);
            self.persist().await;
        }
    }

    async fn persist(&self) {
        let snapshot = self.store.snapshot();
        if let Err(e) = self.persistence.save(&snapshot).await {
            tracing::warn!("Failed to persist chat snapshot: {}", e);
        }
    }

    fn fail(&self, operation: &str, error: TransportError) -> SyncError {
        tracing::warn!("Failed to {}: {}", operation, error);
        let message = error.to_string();
        self.status
            .send_modify(|status| status.last_error = Some(message));
        SyncError::Transport(error)
    }
}

fn warn_stale<T: crate::shared::messaging::Entity>(kind: &str, existing: &[T], incoming: &[T]) {
    let stale = merge::stale_ids(existing, incoming);
    if !stale.is_empty() {
        tracing::warn!(
            "Server sent {} {} record(s) older than the local copy: {:?}",
            stale.len(),
            kind,
            stale
        );
    }
}
