//! # Cart Error Type
//!
//! Unified error type for the cart API.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Cart                               │
//! │                                                                         │
//! │  CartApi call                                                           │
//! │       │                                                                 │
//! │       ├── outside init()..dispose()? ── Configuration (programmer bug)  │
//! │       │                                                                 │
//! │       ├── invalid candidate / overflow ── Core (nothing committed)      │
//! │       │                                                                 │
//! │       ├── gateway.get failed ─────────── StorageRead (init retryable)   │
//! │       │                                                                 │
//! │       ├── snapshot unreadable ────────── HydrationParse (strict only)   │
//! │       │                                                                 │
//! │       └── gateway.set failed ─────────── StorageWrite (state kept,      │
//! │                                           call flush() to retry)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Presentation Serialization
//! [`ErrorResponse`] carries a machine-readable `code` and a human-readable
//! `message`:
//! ```json
//! { "code": "STORAGE_ERROR", "message": "Failed to save cart under '@GoMarketplace:products': ..." }
//! ```

use serde::Serialize;
use thiserror::Error;

use gomarket_core::{CodecError, CoreError};
use gomarket_db::DbError;

use crate::gateway::GatewayError;

/// Errors returned by the cart store, service and API.
#[derive(Debug, Error)]
pub enum CartError {
    /// The API was used outside its initialized lifecycle.
    ///
    /// ## When This Occurs
    /// - `products()` or a mutation before `init()` completed
    /// - Any call after `dispose()`
    /// - A second `init()` or hydration
    #[error("Cart misuse in {operation}: {reason}")]
    Configuration {
        operation: &'static str,
        reason: String,
    },

    /// The stored snapshot exists but cannot be decoded.
    #[error("Stored cart snapshot is unreadable: {0}")]
    HydrationParse(#[source] CodecError),

    /// The gateway failed to read the snapshot.
    #[error("Failed to load cart from '{key}': {source}")]
    StorageRead {
        key: String,
        #[source]
        source: GatewayError,
    },

    /// The gateway rejected a snapshot write. The in-memory cart is kept.
    #[error("Failed to save cart under '{key}': {source}")]
    StorageWrite {
        key: String,
        #[source]
        source: GatewayError,
    },

    /// A cart rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Opening the database failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl CartError {
    /// Creates a lifecycle misuse error.
    pub fn configuration(operation: &'static str, reason: impl Into<String>) -> Self {
        CartError::Configuration {
            operation,
            reason: reason.into(),
        }
    }

    /// Machine-readable category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CartError::Configuration { .. } => ErrorCode::ConfigurationError,
            CartError::HydrationParse(_) => ErrorCode::CorruptSnapshot,
            CartError::StorageRead { .. } | CartError::StorageWrite { .. } => {
                ErrorCode::StorageError
            }
            CartError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            CartError::Core(CoreError::QuantityOverflow { .. }) => ErrorCode::CartError,
            CartError::Core(CoreError::Codec(_)) => ErrorCode::Internal,
            CartError::Db(_) => ErrorCode::DatabaseError,
        }
    }

    /// Whether the same call may succeed later without code changes.
    pub fn is_retryable(&self) -> bool {
        match self {
            CartError::StorageRead { source, .. } | CartError::StorageWrite { source, .. } => {
                source.is_transient()
            }
            _ => false,
        }
    }
}

/// Result type for cart operations.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Presentation Form
// =============================================================================

/// Error codes for presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// API used outside its lifecycle (programmer error)
    ConfigurationError,

    /// Stored cart could not be decoded
    CorruptSnapshot,

    /// Persistence gateway failed
    StorageError,

    /// Input validation failed
    ValidationError,

    /// Cart rule rejected the operation
    CartError,

    /// Database could not be opened
    DatabaseError,

    /// Internal error
    Internal,
}

/// Serializable error handed to presentation code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Whether retrying may help (e.g. "cart not saved, try again")
    pub retryable: bool,
}

impl From<&CartError> for ErrorResponse {
    fn from(err: &CartError) -> Self {
        ErrorResponse {
            code: err.code(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}
