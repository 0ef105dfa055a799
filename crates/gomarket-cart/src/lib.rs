//! # gomarket-cart: Shopping Cart State for GoMarket
//!
//! Owns the in-memory cart, keeps it in sync with persistent storage and
//! exposes it to presentation code through [`CartApi`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GoMarket Cart Architecture                       │
//! │                                                                         │
//! │  Presentation code (product list, cart screen)                          │
//! │       │  products()  add_to_cart()  increment()  decrement()            │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ gomarket-cart (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   CartApi ──► CartService ──► CartStore (watch + writer lock)   │   │
//! │  │                    │                                            │   │
//! │  │                    └──► Arc<dyn PersistenceGateway>             │   │
//! │  └────────────┬─────────────────────────────┬──────────────────────┘   │
//! │               │                             │                          │
//! │  ┌────────────▼────────────┐   ┌────────────▼────────────────────┐     │
//! │  │  gomarket-core          │   │  gomarket-db                    │     │
//! │  │  cart rules + codec     │   │  SQLite kv_store                │     │
//! │  └─────────────────────────┘   └─────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] - `CartApi` and its lifecycle
//! - [`service`] - Hydration and mutations
//! - [`store`] - The in-memory snapshot
//! - [`gateway`] - Persistence contract, SQLite and memory gateways
//! - [`config`] - `CartConfig`
//! - [`error`] - `CartError` and its presentation form
//! - [`telemetry`] - Tracing setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gomarket_cart::{init_tracing, CartApi, CartConfig, NewLineItem};
//!
//! init_tracing();
//!
//! let api = CartApi::open(CartConfig::from_env()).await?;
//! api.init().await?;
//!
//! api.add_to_cart(NewLineItem::new("1", "Shoe", "https://img/shoe.png", 100.0)).await?;
//! api.increment("1").await?;
//!
//! for item in &api.products()? {
//!     println!("{} x{}", item.title, item.quantity);
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod service;
pub mod store;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{CartApi, Lifecycle};
pub use config::{CartConfig, CorruptSnapshotPolicy};
pub use error::{CartError, CartResult, ErrorCode, ErrorResponse};
pub use gateway::{GatewayError, MemoryGateway, PersistenceGateway, SqliteGateway};
pub use service::CartService;
pub use store::CartStore;
pub use telemetry::init_tracing;

pub use gomarket_core::{Cart, LineItem, NewLineItem, PRODUCTS_STORAGE_KEY};
