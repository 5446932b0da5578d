//! # Local Database Module
//!
//! Persistence for the chat snapshot so a restarted client can show the last
//! known timeline before the network answers.
//!
//! ## Architecture
//!
//! The synchronization core only sees the [`SnapshotStore`] trait. It loads
//! once at start and saves after every committed mutation; failures are logged
//! by the caller and never fail the in-memory operation.
//!
//! - `LocalDatabase`: SQLite key-value table via `sqlx`, the snapshot stored as
//!   JSON under the configured storage key
//! - `MemoryStore`: process-local, for tests and throwaway sessions
//! - `schema.rs`: schema version bookkeeping
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatsync::client::local_db::{LocalDatabase, SnapshotStore};
//!
//! # async fn example() -> Result<(), chatsync::shared::StorageError> {
//! let db = LocalDatabase::open("/tmp/chat.db", "tribe-chat-storage").await?;
//! let restored = db.load().await?;
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod schema;

pub use memory::MemoryStore;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;

use crate::client::store::ChatSnapshot;
use crate::shared::error::StorageError;

/// Result type for local database operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Where the chat snapshot is persisted between runs
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Last saved snapshot, or `None` on first run
    async fn load(&self) -> Result<Option<ChatSnapshot>>;

    /// Replace the saved snapshot
    async fn save(&self, snapshot: &ChatSnapshot) -> Result<()>;

    /// Forget the saved snapshot
    async fn clear(&self) -> Result<()>;
}

/// SQLite-backed snapshot store
#[derive(Debug, Clone)]
pub struct LocalDatabase {
    pool: SqlitePool,
    key: String,
}

impl LocalDatabase {
    /// Open or create the database file at `path`
    ///
    /// Creates parent directories as needed and initializes the schema.
    /// Uses WAL mode for better concurrency and performance.
    pub async fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Self::with_pool(pool, key).await
    }

    /// Database living only as long as this value
    ///
    /// Pinned to a single connection; each SQLite in-memory connection is its
    /// own database.
    pub async fn in_memory(key: impl Into<String>) -> Result<Self> {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::with_pool(pool, key).await
    }

    async fn with_pool(pool: SqlitePool, key: impl Into<String>) -> Result<Self> {
        let db = Self {
            pool,
            key: key.into(),
        };
        db.init_schema().await?;
        Ok(db)
    }

    /// Initialize database schema
    ///
    /// Creates all necessary tables and runs any pending migrations.
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        let (current_version,): (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await?;

        for version in schema::pending_migrations(current_version) {
            tracing::debug!("Applying local database migration {}", version);
            sqlx::query(schema::migration_sql(version))
                .execute(&self.pool)
                .await?;
            sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
                .bind(version)
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Key the snapshot is stored under
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl SnapshotStore for LocalDatabase {
    async fn load(&self) -> Result<Option<ChatSnapshot>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((value,)) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &ChatSnapshot) -> Result<()> {
        let value = serde_json::to_string(snapshot)?;
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(&self.key)
        .bind(value)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(&self.key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
