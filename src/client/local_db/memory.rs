//! In-process snapshot store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Result, SnapshotStore};
use crate::client::store::ChatSnapshot;

/// Keeps the snapshot in memory; counts saves so tests can observe them
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Option<ChatSnapshot>>,
    saves: std::sync::atomic::AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded as if a previous run had saved `snapshot`
    pub fn with_snapshot(snapshot: ChatSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> usize {
        self.saves.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Currently saved snapshot
    pub async fn saved(&self) -> Option<ChatSnapshot> {
        self.snapshot.read().await.clone()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<ChatSnapshot>> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &ChatSnapshot) -> Result<()> {
        *self.snapshot.write().await = Some(snapshot.clone());
        self.saves.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.snapshot.write().await = None;
        Ok(())
    }
}
