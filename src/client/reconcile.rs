//! # Session Reconciliation
//!
//! Decides whether locally held state still belongs to the server's current
//! data epoch. When the server restarts with fresh data it issues a new session
//! marker; merging the old timeline into the new one would resurrect records
//! that no longer exist, so the store is discarded instead.
//!
//! | persisted marker | fetched marker | action |
//! |---|---|---|
//! | none | any | keep state, adopt marker |
//! | equal | equal | keep state |
//! | differs | any | clear store, adopt marker |

use crate::client::store::{ChatSnapshot, EntityStore};
use crate::shared::messaging::SessionInfo;

/// Outcome of comparing the persisted session marker with the server's
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationResult {
    /// No marker was persisted; local state is kept
    FirstRun,
    /// Markers match; local state is kept
    SameSession,
    /// Markers differ; local state was discarded
    SessionReset {
        /// Marker the discarded state belonged to
        previous: String,
    },
}

impl ReconciliationResult {
    /// Whether the store was cleared
    pub fn is_reset(&self) -> bool {
        matches!(self, Self::SessionReset { .. })
    }
}

/// Compare the persisted marker with the fetched one
pub fn compare_sessions(persisted: Option<&str>, fetched: &str) -> ReconciliationResult {
    match persisted {
        None => ReconciliationResult::FirstRun,
        Some(previous) if previous == fetched => ReconciliationResult::SameSession,
        Some(previous) => ReconciliationResult::SessionReset {
            previous: previous.to_string(),
        },
    }
}

/// Applies the session check to an [`EntityStore`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionReconciler;

impl SessionReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Check `info` against the store and adopt its marker.
    ///
    /// Clearing and adopting the new marker happen in one store commit, so no
    /// reader sees an empty store still tagged with the old session.
    pub fn reconcile(&self, store: &EntityStore, info: &SessionInfo) -> ReconciliationResult {
        let mut result = ReconciliationResult::SameSession;
        store.update(|current| {
            result = compare_sessions(current.session_id.as_deref(), &info.session_id);
            match &result {
                ReconciliationResult::SameSession => None,
                ReconciliationResult::FirstRun => Some(ChatSnapshot {
                    session_id: Some(info.session_id.clone()),
                    ..current.clone()
                }),
                ReconciliationResult::SessionReset { .. } => Some(ChatSnapshot {
                    session_id: Some(info.session_id.clone()),
                    ..ChatSnapshot::default()
                }),
            }
        });

        match &result {
            ReconciliationResult::SessionReset { previous } => tracing::info!(
                "Server session changed from {} to {}, discarding local state",
                previous,
                info.session_id
            ),
            ReconciliationResult::FirstRun => {
                tracing::info!("Adopting server session {}", info.session_id)
            }
            ReconciliationResult::SameSession => {
                tracing::debug!("Server session {} unchanged", info.session_id)
            }
        }
        result
    }
}
