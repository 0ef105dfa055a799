//! # Snapshot Codec
//!
//! Encodes a [`Cart`] into the text stored under the products key, and back.
//!
//! ## Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stored Snapshot Formats                            │
//! │                                                                         │
//! │  Version 1 (written by encode_snapshot)                                │
//! │  {                                                                      │
//! │    "version": 1,                                                        │
//! │    "saved_at": "2026-10-17T09:30:00Z",                                  │
//! │    "items": [ {"id", "title", "image_url", "price", "quantity"}, ... ] │
//! │  }                                                                      │
//! │                                                                         │
//! │  Legacy (read only)                                                     │
//! │  [ {"id", "title", "image_url", "price", "quantity"}, ... ]             │
//! │                                                                         │
//! │  Unknown item fields are ignored, so adding a field to LineItem in a    │
//! │  later version does not break older readers of the same version.        │
//! │  An envelope with version 0 or above SNAPSHOT_VERSION is rejected.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoded carts go through the same validation as [`Cart::from_items`].

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CodecError;
use crate::types::{Cart, LineItem};
use crate::validation::validate_cart_items;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Layout a snapshot was stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Bare item array with no envelope.
    Legacy,
    /// Versioned envelope.
    Versioned(u32),
}

/// A decoded snapshot plus its envelope metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub format: SnapshotFormat,
    /// When the snapshot was written, if the format records it.
    pub saved_at: Option<DateTime<Utc>>,
    pub cart: Cart,
}

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    items: &'a [LineItem],
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    items: Value,
}

/// Encodes a cart as a version 1 snapshot.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use gomarket_core::{decode_snapshot, encode_snapshot, Cart, NewLineItem};
///
/// let cart = Cart::new()
///     .add_to_cart(&NewLineItem::new("1", "Shoe", "u", 100.0))
///     .unwrap();
///
/// let text = encode_snapshot(&cart, Utc::now()).unwrap();
/// assert_eq!(decode_snapshot(&text).unwrap(), cart);
/// ```
pub fn encode_snapshot(cart: &Cart, saved_at: DateTime<Utc>) -> Result<String, CodecError> {
    let envelope = EnvelopeOut {
        version: SNAPSHOT_VERSION,
        saved_at,
        items: cart.items(),
    };

    Ok(serde_json::to_string(&envelope)?)
}

/// Decodes stored snapshot text into a cart.
pub fn decode_snapshot(text: &str) -> Result<Cart, CodecError> {
    read_snapshot(text).map(|snapshot| snapshot.cart)
}

/// Decodes stored snapshot text, keeping the envelope metadata.
///
/// ## Errors
/// - [`CodecError::Malformed`]: not JSON, or not an array/envelope of items
/// - [`CodecError::UnsupportedVersion`]: envelope version 0, or newer than
///   this release
/// - [`CodecError::Invalid`]: items parse but break a cart invariant
pub fn read_snapshot(text: &str) -> Result<Snapshot, CodecError> {
    let raw: Value = serde_json::from_str(text)?;

    let (format, saved_at, items) = match raw {
        Value::Array(_) => (SnapshotFormat::Legacy, None, raw),
        Value::Object(_) => {
            let envelope: EnvelopeIn = serde_json::from_value(raw)?;
            if envelope.version == 0 || envelope.version > SNAPSHOT_VERSION {
                return Err(CodecError::UnsupportedVersion {
                    found: envelope.version,
                    supported: SNAPSHOT_VERSION,
                });
            }
            (
                SnapshotFormat::Versioned(envelope.version),
                envelope.saved_at,
                envelope.items,
            )
        }
        _ => {
            return Err(CodecError::Malformed(serde_json::Error::custom(
                "expected an item array or a snapshot envelope",
            )))
        }
    };

    let items: Vec<LineItem> = serde_json::from_value(items)?;
    validate_cart_items(&items)?;

    Ok(Snapshot {
        format,
        saved_at,
        cart: Cart { items },
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
