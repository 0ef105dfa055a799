//! # Cart Service
//!
//! Hydration plus the add/increment/decrement operations, each followed by
//! a write of the resulting cart to the persistence gateway.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_to_cart / increment / decrement                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.begin()            ← waits for the previous mutation             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  operation.apply(current) ← pure, gomarket-core                         │
//! │       │        └── Err ──► nothing committed, nothing written           │
//! │       ▼                                                                 │
//! │  tx.commit(next)          ← visible to products() immediately           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  gateway.set(key, encode(next))                                         │
//! │       │        └── Err ──► StorageWrite, commit stands                  │
//! │       ▼                                                                 │
//! │  Ok(next), transaction dropped                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use gomarket_core::cart::CartOperation;
use gomarket_core::codec::{encode_snapshot, read_snapshot};
use gomarket_core::{Cart, CoreError, NewLineItem};

use crate::config::{CartConfig, CorruptSnapshotPolicy};
use crate::error::{CartError, CartResult};
use crate::gateway::PersistenceGateway;
use crate::store::CartStore;

/// Cart domain logic over a [`CartStore`] and a [`PersistenceGateway`].
#[derive(Debug)]
pub struct CartService {
    store: CartStore,
    gateway: Arc<dyn PersistenceGateway>,
    storage_key: String,
    corrupt_snapshot: CorruptSnapshotPolicy,
    hydrated: AtomicBool,
    closed: AtomicBool,
}

impl CartService {
    /// Creates a service with an empty, not yet hydrated store.
    pub fn new(gateway: Arc<dyn PersistenceGateway>, config: &CartConfig) -> Self {
        CartService {
            store: CartStore::new(),
            gateway,
            storage_key: config.storage_key.clone(),
            corrupt_snapshot: config.corrupt_snapshot,
            hydrated: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// The store this service commits to.
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Key the snapshot is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Whether hydration has completed.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::Acquire)
    }

    /// Whether [`CartService::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Loads the persisted cart into the store, replacing its contents.
    ///
    /// ## Behavior
    /// - No stored snapshot: the cart stays empty
    /// - Readable snapshot: committed wholesale
    /// - Unreadable snapshot: empty cart, or `HydrationParse` under
    ///   [`CorruptSnapshotPolicy::Reject`]
    ///
    /// Runs at most once. A failed gateway read leaves the service
    /// unhydrated so hydration can be attempted again.
    pub async fn hydrate(&self) -> CartResult<Cart> {
        let mut tx = self.store.begin().await;

        if self.is_closed() {
            return Err(CartError::configuration("hydrate", "cart is disposed"));
        }
        if self.is_hydrated() {
            return Err(CartError::configuration(
                "hydrate",
                "cart has already been hydrated",
            ));
        }

        let stored = self
            .gateway
            .get(&self.storage_key)
            .await
            .map_err(|source| CartError::StorageRead {
                key: self.storage_key.clone(),
                source,
            })?;

        let cart = match stored {
            None => {
                info!(key = %self.storage_key, "No stored cart, starting empty");
                Cart::new()
            }
            Some(text) => match read_snapshot(&text) {
                Ok(snapshot) => {
                    info!(
                        key = %self.storage_key,
                        items = snapshot.cart.len(),
                        format = ?snapshot.format,
                        saved_at = ?snapshot.saved_at,
                        "Cart hydrated"
                    );
                    snapshot.cart
                }
                Err(err) => match self.corrupt_snapshot {
                    CorruptSnapshotPolicy::FallbackToEmpty => {
                        warn!(
                            key = %self.storage_key,
                            error = %err,
                            "Stored cart is unreadable, starting empty"
                        );
                        Cart::new()
                    }
                    CorruptSnapshotPolicy::Reject => {
                        error!(key = %self.storage_key, error = %err, "Stored cart is unreadable");
                        return Err(CartError::HydrationParse(err));
                    }
                },
            },
        };

        tx.commit(cart.clone());
        self.hydrated.store(true, Ordering::Release);

        Ok(cart)
    }

    /// Adds one unit of a product, appending it if it is not in the cart.
    pub async fn add_to_cart(&self, candidate: NewLineItem) -> CartResult<Cart> {
        self.apply(CartOperation::AddToCart(candidate)).await
    }

    /// Adds one unit to the item with `id`. Unknown ids change nothing.
    pub async fn increment(&self, id: &str) -> CartResult<Cart> {
        self.apply(CartOperation::Increment(id.to_string())).await
    }

    /// Removes one unit from the item with `id`, dropping it at zero.
    /// Unknown ids change nothing.
    pub async fn decrement(&self, id: &str) -> CartResult<Cart> {
        self.apply(CartOperation::Decrement(id.to_string())).await
    }

    /// Writes the current cart again without changing it.
    ///
    /// Use after a `StorageWrite` error to bring storage back in line with
    /// the in-memory cart.
    pub async fn flush(&self) -> CartResult<()> {
        let tx = self.store.begin().await;
        self.ensure_open("flush")?;

        debug!(items = tx.current().len(), "Flushing cart");
        self.persist(tx.current()).await
    }

    /// Rejects every later call.
    ///
    /// Waits for the transaction in progress, so its write completes before
    /// this returns and nothing is written afterwards.
    pub async fn close(&self) {
        let _tx = self.store.begin().await;
        self.closed.store(true, Ordering::Release);
    }

    async fn apply(&self, operation: CartOperation) -> CartResult<Cart> {
        let mut tx = self.store.begin().await;
        self.ensure_open(operation.name())?;

        let next = operation.apply(tx.current())?;
        tx.commit(next.clone());

        debug!(
            operation = operation.name(),
            id = %operation.item_id(),
            quantity = next.get(operation.item_id()).map(|item| item.quantity).unwrap_or(0),
            items = next.len(),
            "Cart committed"
        );

        self.persist(&next).await?;

        Ok(next)
    }

    async fn persist(&self, cart: &Cart) -> CartResult<()> {
        let text = encode_snapshot(cart, Utc::now()).map_err(CoreError::from)?;

        self.gateway
            .set(&self.storage_key, text)
            .await
            .map_err(|source| {
                error!(
                    key = %self.storage_key,
                    error = %source,
                    "Failed to persist cart, in-memory cart kept"
                );
                CartError::StorageWrite {
                    key: self.storage_key.clone(),
                    source,
                }
            })
    }

    /// Checked while holding the transaction, so it cannot race `close`.
    fn ensure_open(&self, operation: &'static str) -> CartResult<()> {
        if self.is_closed() {
            Err(CartError::configuration(operation, "cart is disposed"))
        } else if !self.is_hydrated() {
            Err(CartError::configuration(
                operation,
                "cart has not been hydrated yet",
            ))
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
