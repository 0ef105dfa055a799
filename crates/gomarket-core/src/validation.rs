//! # Validation Module
//!
//! Input validation for cart candidates and decoded snapshots.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Points                                  │
//! │                                                                         │
//! │  add_to_cart(candidate)                                                │
//! │  └── validate_candidate: id present, price finite and >= 0             │
//! │                                                                         │
//! │  decode_snapshot(text)                                                 │
//! │  └── validate_cart_items: every item valid, quantity >= 1, ids unique  │
//! │                                                                         │
//! │  A cart that fails validation is never committed or persisted.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gomarket_core::validation::{validate_price, validate_quantity};
//!
//! assert!(validate_price(19.99).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{LineItem, NewLineItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an item id.
///
/// ## Rules
/// - Must not be empty or whitespace only
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be a finite number
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use gomarket_core::validation::validate_price;
///
/// assert!(validate_price(0.0).is_ok());
/// assert!(validate_price(-1.0).is_err());
/// assert!(validate_price(f64::NAN).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "price".to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stored quantity.
///
/// ## Rules
/// - Must be positive: an item at 0 is removed, never stored
pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates an `add_to_cart` candidate.
pub fn validate_candidate(candidate: &NewLineItem) -> ValidationResult<()> {
    validate_item_id(&candidate.id)?;
    validate_price(candidate.price)
}

/// Validates a single line item.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_item_id(&item.id)?;
    validate_price(item.price)?;
    validate_quantity(item.quantity)
}

/// Validates a full item list as a cart.
///
/// ## Rules
/// - Every item passes [`validate_line_item`]
/// - No two items share an id
pub fn validate_cart_items(items: &[LineItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        validate_line_item(item)?;

        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, price: f64, quantity: u32) -> LineItem {
        LineItem {
            id: id.to_string(),
            title: "Shoe".to_string(),
            image_url: "u".to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_validate_item_id() {
        assert!(validate_item_id("1").is_ok());
        assert!(validate_item_id("").is_err());
        assert!(validate_item_id("   ").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(100.0).is_ok());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
        assert!(validate_price(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_candidate() {
        assert!(validate_candidate(&NewLineItem::new("1", "Shoe", "u", 100.0)).is_ok());
        assert!(matches!(
            validate_candidate(&NewLineItem::new("", "Shoe", "u", 100.0)),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_candidate(&NewLineItem::new("1", "Shoe", "u", -5.0)),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_cart_items() {
        assert!(validate_cart_items(&[]).is_ok());
        assert!(validate_cart_items(&[line("1", 1.0, 1), line("2", 2.0, 9)]).is_ok());

        assert!(matches!(
            validate_cart_items(&[line("1", 1.0, 0)]),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_cart_items(&[line("1", 1.0, 1), line("1", 1.0, 2)]),
            Err(ValidationError::Duplicate { .. })
        ));
    }
}
