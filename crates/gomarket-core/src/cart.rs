//! # Cart Transformations
//!
//! The add/increment/decrement rules, as pure functions from one [`Cart`] to
//! the next.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transformations                                 │
//! │                                                                         │
//! │  Operation           Item present?       Result                         │
//! │  ─────────           ─────────────       ──────                         │
//! │                                                                         │
//! │  add_to_cart(c) ───► yes ──────────────► fields from c, quantity + 1    │
//! │                 └──► no  ──────────────► c appended with quantity 1     │
//! │                                                                         │
//! │  increment(id) ────► yes ──────────────► quantity + 1                   │
//! │                 └──► no  ──────────────► unchanged                      │
//! │                                                                         │
//! │  decrement(id) ────► yes, quantity > 1 ► quantity - 1                   │
//! │                 ├──► yes, quantity = 1 ► item removed                   │
//! │                 └──► no  ──────────────► unchanged                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::types::{Cart, LineItem, NewLineItem};
use crate::validation::validate_candidate;

impl Cart {
    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product already in cart: its title, image and price are replaced by
    ///   the candidate's and its quantity grows by one, in place
    /// - Product not in cart: appended with quantity 1
    ///
    /// ## Errors
    /// - [`CoreError::Validation`] for an empty id or invalid price
    /// - [`CoreError::QuantityOverflow`] if the quantity cannot grow
    pub fn add_to_cart(&self, candidate: &NewLineItem) -> CoreResult<Cart> {
        validate_candidate(candidate)?;

        let mut items = self.items.clone();

        match items.iter_mut().find(|item| item.id == candidate.id) {
            Some(existing) => {
                let quantity = bump(existing)?;
                *existing = LineItem::from_candidate(candidate, quantity);
            }
            None => items.push(LineItem::from_candidate(candidate, 1)),
        }

        Ok(Cart { items })
    }

    /// Adds one unit to the item with this id. Unknown ids leave the cart as is.
    ///
    /// ## Errors
    /// - [`CoreError::QuantityOverflow`] if the quantity cannot grow
    pub fn increment(&self, id: &str) -> CoreResult<Cart> {
        let mut items = self.items.clone();

        if let Some(item) = items.iter_mut().find(|item| item.id == id) {
            item.quantity = bump(item)?;
        }

        Ok(Cart { items })
    }

    /// Removes one unit from the item with this id, dropping it at zero.
    /// Unknown ids leave the cart as is.
    pub fn decrement(&self, id: &str) -> Cart {
        let items = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.id == id {
                    item.quantity = item.quantity.saturating_sub(1);
                }
                item
            })
            .filter(|item| item.quantity != 0)
            .collect();

        Cart { items }
    }
}

fn bump(item: &LineItem) -> CoreResult<u32> {
    item.quantity
        .checked_add(1)
        .ok_or_else(|| CoreError::QuantityOverflow {
            id: item.id.clone(),
            max: u32::MAX,
        })
}

// =============================================================================
// Cart Operation
// =============================================================================

/// A single cart mutation, as requested by the caller.
///
/// Lets the service run every mutation through one read-transform-commit path.
#[derive(Debug, Clone, PartialEq)]
pub enum CartOperation {
    /// Add one unit of a product (see [`Cart::add_to_cart`]).
    AddToCart(NewLineItem),
    /// Add one unit to an existing item (see [`Cart::increment`]).
    Increment(String),
    /// Remove one unit from an existing item (see [`Cart::decrement`]).
    Decrement(String),
}

impl CartOperation {
    /// Short name used in log events and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            CartOperation::AddToCart(_) => "add_to_cart",
            CartOperation::Increment(_) => "increment",
            CartOperation::Decrement(_) => "decrement",
        }
    }

    /// Id of the item this operation targets.
    pub fn item_id(&self) -> &str {
        match self {
            CartOperation::AddToCart(candidate) => &candidate.id,
            CartOperation::Increment(id) | CartOperation::Decrement(id) => id,
        }
    }

    /// Applies the operation to `cart`, returning the next cart.
    pub fn apply(&self, cart: &Cart) -> CoreResult<Cart> {
        match self {
            CartOperation::AddToCart(candidate) => cart.add_to_cart(candidate),
            CartOperation::Increment(id) => cart.increment(id),
            CartOperation::Decrement(id) => Ok(cart.decrement(id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
