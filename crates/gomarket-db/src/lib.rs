//! # gomarket-db: Database Layer for the GoMarket cart
//!
//! This crate provides the SQLite-backed key-value store the cart snapshot
//! is persisted to. It uses sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GoMarket Cart Data Flow                          │
//! │                                                                         │
//! │  CartService (gomarket-cart) ── gateway.set(key, snapshot)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     gomarket-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌─────────────┐  │   │
//! │  │   │   Database    │    │    Repository      │  │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│     (kv.rs)        │  │ (embedded)  │  │   │
//! │  │   │ SqlitePool    │    │ KeyValueRepository │  │ 001_kv.sql  │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (gomarket.db)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gomarket_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/gomarket.db")).await?;
//!
//! db.key_values().set("@GoMarketplace:products", "[]").await?;
//! let stored = db.key_values().get("@GoMarketplace:products").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::kv::KeyValueRepository;
