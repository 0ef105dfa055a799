//! # Domain Types
//!
//! Core domain types used throughout the GoMarket cart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  NewLineItem    │   │    LineItem     │   │      Cart       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id             │◄──│  items (ordered,│       │
//! │  │  title          │   │  title          │   │   unique ids)   │       │
//! │  │  image_url      │   │  image_url      │   │                 │       │
//! │  │  price          │   │  price          │   └─────────────────┘       │
//! │  └─────────────────┘   │  quantity (≥1)  │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - No item is ever held with quantity 0: decrementing the last unit removes it
//! - No two items in a [`Cart`] share an `id`
//! - New items go to the end; updated items keep their position

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::validation::validate_cart_items;

// =============================================================================
// Line Item
// =============================================================================

/// A product reference plus quantity held in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Product identifier, unique within a cart.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Product image URI.
    pub image_url: String,

    /// Unit price as supplied by the catalog.
    pub price: f64,

    /// Units in the cart, always at least 1.
    pub quantity: u32,
}

impl LineItem {
    /// Builds a line item from an add-to-cart candidate.
    pub fn from_candidate(candidate: &NewLineItem, quantity: u32) -> Self {
        LineItem {
            id: candidate.id.clone(),
            title: candidate.title.clone(),
            image_url: candidate.image_url.clone(),
            price: candidate.price,
            quantity,
        }
    }
}

// =============================================================================
// New Line Item
// =============================================================================

/// The product data passed to `add_to_cart`: a [`LineItem`] without quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewLineItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl NewLineItem {
    /// Creates a candidate from its parts.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        NewLineItem {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The ordered, id-unique collection of line items.
///
/// Carts are values: every operation in [`crate::cart`] returns a new cart
/// and leaves the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    pub(crate) items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from existing items, checking every cart invariant.
    ///
    /// ## Errors
    /// - Empty id, zero quantity, negative or non-finite price
    /// - Two items with the same id
    pub fn from_items(items: Vec<LineItem>) -> CoreResult<Self> {
        validate_cart_items(&items)?;
        Ok(Cart { items })
    }

    /// Items in cart order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consumes the cart, returning its items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether an item with this id is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of unique items in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total quantity of all items (badge count).
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: u32) -> LineItem {
        LineItem {
            id: id.to_string(),
            title: format!("Product {}", id),
            image_url: format!("https://img.example/{}.png", id),
            price: 10.0,
            quantity,
        }
    }

    #[test]
    fn test_cart_starts_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_from_items_keeps_order() {
        let cart = Cart::from_items(vec![item("b", 1), item("a", 3)]).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(cart.total_quantity(), 4);
        assert!(cart.contains("a"));
        assert!(!cart.contains("c"));
    }

    #[test]
    fn test_from_items_rejects_duplicates_and_zero_quantity() {
        assert!(Cart::from_items(vec![item("a", 1), item("a", 2)]).is_err());
        assert!(Cart::from_items(vec![item("a", 0)]).is_err());
    }

    #[test]
    fn test_line_item_from_candidate() {
        let candidate = NewLineItem::new("7", "Hat", "https://img.example/7.png", 25.5);
        let line = LineItem::from_candidate(&candidate, 1);

        assert_eq!(line.id, "7");
        assert_eq!(line.title, "Hat");
        assert_eq!(line.price, 25.5);
        assert_eq!(line.quantity, 1);
    }
}
