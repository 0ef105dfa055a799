//! # gomarket-core: Pure Cart Logic for GoMarket
//!
//! This crate is the **heart** of the GoMarket cart. It contains the cart
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GoMarket Cart Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (out of scope)               │   │
//! │  │        Product list ──► Cart screen ──► Checkout                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              gomarket-cart (CartApi / CartService)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gomarket-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   cart    │  │   codec   │  │ validation│   │   │
//! │  │   │ LineItem  │  │ add/inc/  │  │ snapshot  │  │   rules   │   │   │
//! │  │   │   Cart    │  │   dec     │  │  v1 JSON  │  │  checks   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO ASYNC • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `LineItem`, `NewLineItem` and `Cart`
//! - [`cart`] - add/increment/decrement transformations
//! - [`codec`] - Versioned snapshot encoding
//! - [`error`] - Domain error types
//! - [`validation`] - Input and snapshot validation
//!
//! ## Example Usage
//!
//! ```rust
//! use gomarket_core::{Cart, NewLineItem};
//!
//! let shoe = NewLineItem::new("1", "Shoe", "u", 100.0);
//!
//! let cart = Cart::new().add_to_cart(&shoe).unwrap();
//! let cart = cart.add_to_cart(&shoe).unwrap();
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.get("1").map(|item| item.quantity), Some(2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod codec;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use codec::{decode_snapshot, encode_snapshot, SNAPSHOT_VERSION};
pub use error::{CodecError, CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key under which the whole cart snapshot is stored.
///
/// Carts written by earlier releases live under the same key, so this value
/// must never change.
pub const PRODUCTS_STORAGE_KEY: &str = "@GoMarketplace:products";
