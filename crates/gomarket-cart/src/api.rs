//! # Cart API
//!
//! The surface presentation code talks to. Wraps [`CartService`] in an
//! explicit lifecycle so the cart is never read or mutated before it has
//! been hydrated.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Uninitialized ── init() ──► Initializing ── hydrated ──► Ready        │
//! │        ▲                           │                        │           │
//! │        └─ read/decode error, ──────┤                        │           │
//! │        │  init() dropped           │                        │           │
//! │        │                           ▼                        │           │
//! │        └──────────────── dispose() ──────► Disposed ◄───────┘           │
//! │                                                                         │
//! │   products / add_to_cart / increment / decrement / flush / subscribe    │
//! │   are only valid in Ready. Everything else is a Configuration error.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let api = CartApi::open(CartConfig::from_env()).await?;
//! api.init().await?;
//!
//! api.add_to_cart(NewLineItem::new("1", "Shoe", "https://img/shoe.png", 100.0)).await?;
//! let cart = api.products()?;
//!
//! api.dispose().await?;
//! ```

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use gomarket_core::{Cart, NewLineItem};
use gomarket_db::{Database, DbConfig, DbError};

use crate::config::CartConfig;
use crate::error::{CartError, CartResult};
use crate::gateway::{PersistenceGateway, SqliteGateway};
use crate::service::CartService;

/// Where a [`CartApi`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready,
    Disposed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Initializing => "initializing",
            Lifecycle::Ready => "ready",
            Lifecycle::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

/// The cart facade handed to presentation code.
///
/// Constructed explicitly and passed to whoever needs it; there is no
/// process-wide instance.
#[derive(Debug)]
pub struct CartApi {
    service: CartService,
    lifecycle: watch::Sender<Lifecycle>,
    /// Set when the API opened its own database.
    database: Option<Database>,
}

impl CartApi {
    /// Creates an uninitialized API over any gateway.
    pub fn new(gateway: Arc<dyn PersistenceGateway>, config: &CartConfig) -> Self {
        let (lifecycle, _) = watch::channel(Lifecycle::Uninitialized);
        CartApi {
            service: CartService::new(gateway, config),
            lifecycle,
            database: None,
        }
    }

    /// Opens the SQLite database named by `config` and creates an
    /// uninitialized API persisting to it.
    ///
    /// The database is closed by [`CartApi::dispose`].
    pub async fn open(config: CartConfig) -> CartResult<Self> {
        config.ensure_database_dir().map_err(|e| {
            DbError::ConnectionFailed(format!(
                "Cannot create directory for {}: {}",
                config.database_path.display(),
                e
            ))
        })?;

        info!(path = %config.database_path.display(), "Opening cart database");
        let db = Database::new(DbConfig::new(config.database_path.clone())).await?;

        let mut api = CartApi::new(Arc::new(SqliteGateway::new(&db)), &config);
        api.database = Some(db);
        Ok(api)
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.borrow()
    }

    /// Hydrates the cart from storage and makes the API usable.
    ///
    /// ## Errors
    /// - `Configuration` unless the API is `Uninitialized`, or if
    ///   `dispose()` ran while hydration was in progress
    /// - `StorageRead` or `HydrationParse`: the API returns to
    ///   `Uninitialized` and `init()` may be called again
    ///
    /// Dropping the returned future before it completes also returns the
    /// API to `Uninitialized`.
    pub async fn init(&self) -> CartResult<Cart> {
        self.transition("init", &[Lifecycle::Uninitialized], Lifecycle::Initializing)?;
        let mut guard = InitGuard {
            lifecycle: &self.lifecycle,
            armed: true,
        };

        let cart = self.service.hydrate().await?;
        guard.armed = false;

        self.transition("init", &[Lifecycle::Initializing], Lifecycle::Ready)?;
        info!(items = cart.len(), "Cart ready");
        Ok(cart)
    }

    /// Ends the API's lifecycle.
    ///
    /// Waits for an in-flight mutation or hydration to finish, then closes
    /// the database if this API opened it. An `init()` still in progress
    /// fails with `Configuration`.
    pub async fn dispose(&self) -> CartResult<()> {
        self.transition(
            "dispose",
            &[
                Lifecycle::Uninitialized,
                Lifecycle::Initializing,
                Lifecycle::Ready,
            ],
            Lifecycle::Disposed,
        )?;

        self.service.close().await;
        if let Some(db) = &self.database {
            db.close().await;
        }

        info!("Cart disposed");
        Ok(())
    }

    /// Current cart, read-only.
    pub fn products(&self) -> CartResult<Cart> {
        self.ensure_ready("products")?;
        Ok(self.service.store().read())
    }

    /// Receiver notified with every committed cart.
    pub fn subscribe(&self) -> CartResult<watch::Receiver<Cart>> {
        self.ensure_ready("subscribe")?;
        Ok(self.service.store().subscribe())
    }

    /// Adds one unit of `candidate` to the cart.
    pub async fn add_to_cart(&self, candidate: NewLineItem) -> CartResult<Cart> {
        self.ensure_ready("add_to_cart")?;
        self.service.add_to_cart(candidate).await
    }

    /// Adds one unit to the item with `id`.
    pub async fn increment(&self, id: &str) -> CartResult<Cart> {
        self.ensure_ready("increment")?;
        self.service.increment(id).await
    }

    /// Removes one unit from the item with `id`.
    pub async fn decrement(&self, id: &str) -> CartResult<Cart> {
        self.ensure_ready("decrement")?;
        self.service.decrement(id).await
    }

    /// Rewrites the current cart to storage.
    pub async fn flush(&self) -> CartResult<()> {
        self.ensure_ready("flush")?;
        self.service.flush().await
    }

    fn ensure_ready(&self, operation: &'static str) -> CartResult<()> {
        match self.lifecycle() {
            Lifecycle::Ready => Ok(()),
            state => Err(CartError::configuration(
                operation,
                format!("cart is {state}"),
            )),
        }
    }

    fn transition(
        &self,
        operation: &'static str,
        from: &[Lifecycle],
        to: Lifecycle,
    ) -> CartResult<()> {
        let mut current = to;
        let moved = self.lifecycle.send_if_modified(|state| {
            current = *state;
            if from.contains(state) {
                *state = to;
                true
            } else {
                false
            }
        });

        if moved {
            debug!(from = %current, to = %to, "Cart lifecycle changed");
            Ok(())
        } else {
            Err(CartError::configuration(
                operation,
                format!("cart is {current}"),
            ))
        }
    }
}

/// Returns the lifecycle to `Uninitialized` if `init()` does not finish.
struct InitGuard<'a> {
    lifecycle: &'a watch::Sender<Lifecycle>,
    armed: bool,
}

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let reset = self.lifecycle.send_if_modified(|state| {
            if *state == Lifecycle::Initializing {
                *state = Lifecycle::Uninitialized;
                true
            } else {
                false
            }
        });
        if reset {
            debug!("Cart initialization abandoned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use gomarket_core::{decode_snapshot, PRODUCTS_STORAGE_KEY};

    use crate::gateway::{GatewayError, MemoryGateway};

    /// Gateway whose reads never complete while `stalled` is set.
    #[derive(Debug)]
    struct StalledGateway {
        inner: MemoryGateway,
        stalled: AtomicBool,
    }

    #[async_trait]
    impl PersistenceGateway for StalledGateway {
        async fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
            if self.stalled.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<(), GatewayError> {
            self.inner.set(key, value).await
        }
    }

    /// Gateway that yields to the scheduler before every read.
    #[derive(Debug, Default)]
    struct SlowReadGateway {
        inner: MemoryGateway,
    }

    #[async_trait]
    impl PersistenceGateway for SlowReadGateway {
        async fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<(), GatewayError> {
            self.inner.set(key, value).await
        }
    }

    fn shoe() -> NewLineItem {
        NewLineItem::new("1", "Shoe", "u", 100.0)
    }

    fn memory_api() -> (CartApi, Arc<MemoryGateway>) {
        let gateway = Arc::new(MemoryGateway::new());
        let api = CartApi::new(gateway.clone(), &CartConfig::default());
        (api, gateway)
    }

    #[tokio::test]
    async fn test_calls_before_init_are_rejected() {
        let (api, _) = memory_api();

        assert_eq!(api.lifecycle(), Lifecycle::Uninitialized);
        assert!(matches!(
            api.products(),
            Err(CartError::Configuration { operation: "products", .. })
        ));
        assert!(matches!(
            api.add_to_cart(shoe()).await,
            Err(CartError::Configuration { operation: "add_to_cart", .. })
        ));
        assert!(api.subscribe().is_err());
    }

    #[tokio::test]
    async fn test_init_then_use() {
        let (api, gateway) = memory_api();

        assert!(api.init().await.unwrap().is_empty());
        assert_eq!(api.lifecycle(), Lifecycle::Ready);

        api.add_to_cart(shoe()).await.unwrap();
        api.add_to_cart(shoe()).await.unwrap();
        api.decrement("1").await.unwrap();

        let cart = api.products().unwrap();
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(1));

        let stored = gateway.value(PRODUCTS_STORAGE_KEY).await.unwrap();
        assert_eq!(decode_snapshot(&stored).unwrap(), cart);
    }

    #[tokio::test]
    async fn test_second_init_is_rejected() {
        let (api, _) = memory_api();
        api.init().await.unwrap();

        let err = api.init().await.unwrap_err();
        assert_eq!(err.to_string(), "Cart misuse in init: cart is ready");
        assert_eq!(api.lifecycle(), Lifecycle::Ready);
    }

    #[tokio::test]
    async fn test_failed_init_can_be_retried() {
        let gateway = Arc::new(MemoryGateway::with_entry(PRODUCTS_STORAGE_KEY, "garbage"));
        let config = CartConfig::default()
            .corrupt_snapshot(crate::config::CorruptSnapshotPolicy::Reject);
        let api = CartApi::new(gateway.clone(), &config);

        assert!(matches!(api.init().await, Err(CartError::HydrationParse(_))));
        assert_eq!(api.lifecycle(), Lifecycle::Uninitialized);

        gateway
            .set(PRODUCTS_STORAGE_KEY, "[]".to_string())
            .await
            .unwrap();
        api.init().await.unwrap();
        assert_eq!(api.lifecycle(), Lifecycle::Ready);
    }

    #[tokio::test]
    async fn test_cancelled_init_can_be_retried() {
        let gateway = Arc::new(StalledGateway {
            inner: MemoryGateway::new(),
            stalled: AtomicBool::new(true),
        });
        let api = CartApi::new(gateway.clone(), &CartConfig::default());

        let cancelled = tokio::time::timeout(Duration::from_millis(50), api.init()).await;
        assert!(cancelled.is_err());
        assert_eq!(api.lifecycle(), Lifecycle::Uninitialized);

        gateway.stalled.store(false, Ordering::SeqCst);
        api.init().await.unwrap();
        assert_eq!(api.lifecycle(), Lifecycle::Ready);
        api.add_to_cart(shoe()).await.unwrap();
    }

    #[tokio::test]
    async fn test_dispose_after_cancelled_init() {
        let gateway = Arc::new(StalledGateway {
            inner: MemoryGateway::new(),
            stalled: AtomicBool::new(true),
        });
        let api = CartApi::new(gateway, &CartConfig::default());

        let cancelled = tokio::time::timeout(Duration::from_millis(50), api.init()).await;
        assert!(cancelled.is_err());

        api.dispose().await.unwrap();
        assert_eq!(api.lifecycle(), Lifecycle::Disposed);
    }

    #[tokio::test]
    async fn test_dispose_during_init() {
        let api = CartApi::new(Arc::new(SlowReadGateway::default()), &CartConfig::default());

        let (init, disposed) = tokio::join!(api.init(), async {
            tokio::task::yield_now().await;
            api.dispose().await
        });

        disposed.unwrap();
        assert!(matches!(init, Err(CartError::Configuration { .. })));
        assert_eq!(api.lifecycle(), Lifecycle::Disposed);
        assert!(api.products().is_err());
    }

    #[tokio::test]
    async fn test_dispose_ends_lifecycle() {
        let (api, _) = memory_api();
        api.init().await.unwrap();
        api.add_to_cart(shoe()).await.unwrap();

        api.dispose().await.unwrap();
        assert_eq!(api.lifecycle(), Lifecycle::Disposed);

        assert!(matches!(
            api.increment("1").await,
            Err(CartError::Configuration { .. })
        ));
        assert!(api.products().is_err());
        assert!(api.init().await.is_err());
        assert!(api.dispose().await.is_err());
    }

    #[tokio::test]
    async fn test_dispose_without_init() {
        let (api, _) = memory_api();
        api.dispose().await.unwrap();
        assert_eq!(api.lifecycle(), Lifecycle::Disposed);
    }

    #[tokio::test]
    async fn test_subscribe_sees_commits() {
        let (api, _) = memory_api();
        api.init().await.unwrap();
        let mut receiver = api.subscribe().unwrap();

        api.add_to_cart(shoe()).await.unwrap();

        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_gateway_survives_restart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = CartConfig::default();

        let first = CartApi::new(Arc::new(SqliteGateway::new(&db)), &config);
        first.init().await.unwrap();
        first.add_to_cart(shoe()).await.unwrap();
        first.increment("1").await.unwrap();
        first.dispose().await.unwrap();

        let second = CartApi::new(Arc::new(SqliteGateway::new(&db)), &config);
        let cart = second.init().await.unwrap();
        assert_eq!(cart, first_cart_quantity(2));
    }

    #[tokio::test]
    async fn test_open_creates_database_file() {
        let dir = std::env::temp_dir().join(format!("gomarket-cart-test-{}", std::process::id()));
        let path = dir.join("nested").join("cart.db");
        let config = CartConfig::default().database_path(path.clone());

        let api = CartApi::open(config.clone()).await.unwrap();
        api.init().await.unwrap();
        api.add_to_cart(shoe()).await.unwrap();
        api.dispose().await.unwrap();
        assert!(path.exists());

        let reopened = CartApi::open(config).await.unwrap();
        let cart = reopened.init().await.unwrap();
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(1));
        reopened.dispose().await.unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    fn first_cart_quantity(quantity: u32) -> Cart {
        Cart::from_items(vec![gomarket_core::LineItem::from_candidate(
            &shoe(),
            quantity,
        )])
        .unwrap()
    }
}
