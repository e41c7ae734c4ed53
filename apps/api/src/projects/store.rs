//! Key-value snapshot persistence.
//!
//! The whole project list lives under one key and is overwritten on every
//! mutation. No schema versioning.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::debug;

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;
    async fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed store over the `kv_snapshots` table.
pub struct SqliteSnapshotStore {
    db: SqlitePool,
}

impl SqliteSnapshotStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT value FROM kv_snapshots WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("failed to load snapshot '{key}'"))
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO kv_snapshots (key, value, updated_at) VALUES (?1, ?2, datetime('now')) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .execute(&self.db)
        .await
        .with_context(|| format!("failed to save snapshot '{key}'"))?;

        debug!(key, bytes = value.len(), "snapshot saved");
        Ok(())
    }
}

/// Process-local store, selected with `DATABASE_URL=memory`.
#[derive(Default)]
pub struct MemorySnapshotStore {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
