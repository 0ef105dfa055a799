//! # Persistence Gateway
//!
//! The asynchronous key-value contract the cart is persisted through, and
//! the two gateways shipped with it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartService                                                            │
//! │       │  get(key) -> Option<String>     set(key, value)                 │
//! │       ▼                                                                 │
//! │  Arc<dyn PersistenceGateway>                                           │
//! │       │                                                                 │
//! │       ├── SqliteGateway ──► gomarket-db KeyValueRepository (kv_store)   │
//! │       └── MemoryGateway ──► HashMap (tests, ephemeral sessions)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are opaque to the gateway: encoding belongs to the snapshot codec.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use gomarket_db::{Database, DbError, KeyValueRepository};

/// Errors raised by a persistence gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The underlying database failed.
    #[error("Storage backend error: {0}")]
    Backend(#[from] DbError),

    /// The store refused the write.
    #[error("Write rejected: {0}")]
    Rejected(String),

    /// The store cannot be reached at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    /// Whether the same call may succeed later.
    ///
    /// Database errors defer to [`DbError::is_transient`]: a closed pool or a
    /// failed migration stays broken.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Backend(err) => err.is_transient(),
            GatewayError::Rejected(_) | GatewayError::Unavailable(_) => true,
        }
    }
}

/// Asynchronous key-value store holding opaque string values.
///
/// Implementations serialize their own get/set calls; the cart never issues
/// two writes at once.
#[async_trait]
pub trait PersistenceGateway: Send + Sync + std::fmt::Debug {
    /// Returns the value under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, GatewayError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), GatewayError>;
}

// =============================================================================
// SQLite Gateway
// =============================================================================

/// Gateway backed by the `kv_store` table of a [`Database`].
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    repo: KeyValueRepository,
}

impl SqliteGateway {
    /// Creates a gateway over an open database.
    pub fn new(db: &Database) -> Self {
        SqliteGateway {
            repo: db.key_values(),
        }
    }
}

#[async_trait]
impl PersistenceGateway for SqliteGateway {
    async fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
        Ok(self.repo.get(key).await?)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), GatewayError> {
        Ok(self.repo.set(key, &value).await?)
    }
}

// =============================================================================
// Memory Gateway
// =============================================================================

/// Gateway that keeps values in process memory.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-seeded with one value.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemoryGateway {
            entries: RwLock::new(entries),
        }
    }

    /// Current value under `key`.
    pub async fn value(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
        Ok(self.value(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), GatewayError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
