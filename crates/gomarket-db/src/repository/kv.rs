//! # Key-Value Repository
//!
//! Stores opaque string values by key in the `kv_store` table.
//!
//! The cart only ever writes whole snapshots, so `set` is a single upsert
//! and there is no partial update path.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for key-value operations.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    /// Creates a new KeyValueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Reads the value stored under `key`.
    ///
    /// ## Returns
    /// `Ok(None)` if the key has never been written.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Key-value read");

        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now();

        debug!(key = %key, bytes = value.len(), "Key-value write");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let db = setup().await;

        assert_eq!(db.key_values().get("@GoMarketplace:products").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let db = setup().await;
        let repo = db.key_values();

        repo.set("cart", r#"{"version":1,"items":[]}"#).await.unwrap();

        assert_eq!(
            repo.get("cart").await.unwrap().as_deref(),
            Some(r#"{"version":1,"items":[]}"#)
        );
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let db = setup().await;
        let repo = db.key_values();

        repo.set("cart", "first").await.unwrap();
        repo.set("cart", "second").await.unwrap();
        repo.set("other", "untouched").await.unwrap();

        assert_eq!(repo.get("cart").await.unwrap().as_deref(), Some("second"));
        assert_eq!(repo.get("other").await.unwrap().as_deref(), Some("untouched"));
    }
}
