//! # Error Types
//!
//! Domain-specific error types for gomarket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gomarket-core errors (this file)                                      │
//! │  ├── CoreError        - Cart rule violations                           │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── CodecError       - Snapshot encode/decode failures                │
//! │                                                                         │
//! │  gomarket-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  gomarket-cart errors                                                  │
//! │  └── CartError        - What presentation code sees                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quantity cannot grow any further.
    ///
    /// ## When This Occurs
    /// - `add_to_cart` or `increment` on an item already at `u32::MAX`
    #[error("Quantity for item {id} would exceed maximum ({max})")]
    QuantityOverflow { id: String, max: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Snapshot codec error (wraps CodecError).
    #[error("Snapshot error: {0}")]
    Codec(#[from] CodecError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised for `add_to_cart` candidates and for decoded snapshots.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Duplicate value (e.g., two items with the same id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Codec Error
// =============================================================================

/// Snapshot encode/decode errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stored text is not JSON of any known snapshot shape.
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The envelope version is 0 or newer than this release.
    #[error("Unsupported snapshot version {found} (supported 1 to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The snapshot parsed but breaks a cart invariant.
    #[error("Invalid snapshot contents: {0}")]
    Invalid(#[from] ValidationError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityOverflow {
            id: "1".to_string(),
            max: u32::MAX,
        };
        assert_eq!(
            err.to_string(),
            "Quantity for item 1 would exceed maximum (4294967295)"
        );

        let err = CodecError::UnsupportedVersion {
            found: 7,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "Unsupported snapshot version 7 (supported 1 to 1)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "id is required");

        let err = ValidationError::Duplicate {
            field: "id".to_string(),
            value: "42".to_string(),
        };
        assert_eq!(err.to_string(), "id '42' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
