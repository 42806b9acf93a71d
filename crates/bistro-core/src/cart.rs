//! # Cart
//!
//! The per-session shopping cart and its line items.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Form Action              Operation               Cart Change           │
//! │  ───────────              ─────────               ───────────           │
//! │                                                                         │
//! │  "Add to cart" ──────────► add() ───────────────► qty += 1 or push     │
//! │                                                                         │
//! │  "+" / "-" ──────────────► adjust_quantity() ───► qty += delta         │
//! │                                                   (≤ 0 removes line)   │
//! │                                                                         │
//! │  "Remove" ───────────────► remove() ────────────► line removed         │
//! │                                                                         │
//! │  Order confirmed ────────► remove_ordered() ────► ordered qty removed  │
//! │                                                                         │
//! │  NOTE: none of these fail. Unknown ids are a silent no-op.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is plain data: the web app keeps one per session and hands it to
//! [`crate::pricing`] and [`crate::validation`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// ## Snapshot Semantics
/// `name`, `price` and `image` are frozen when the item is first added.
/// Adding the same id again only bumps the quantity, so a later menu price
/// change never reaches a line already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Menu item id.
    pub id: i64,

    pub name: String,

    /// Unit price at time of adding (frozen).
    pub price: Money,

    pub image: String,

    /// Always ≥ 1 while the line exists.
    pub quantity: i64,
}

impl CartItem {
    /// Unit price × quantity, with negative inputs contributing nothing.
    pub fn line_total(&self) -> Money {
        self.price
            .clamp_non_negative()
            .multiply_quantity(self.quantity.max(0))
    }
}

// =============================================================================
// Operation Results
// =============================================================================

/// Payload for the "item added" notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAdded {
    pub name: String,
    /// Quantity of the line after the add.
    pub quantity: i64,
}

impl ItemAdded {
    pub fn message(&self) -> String {
        format!("{} added to cart!", self.name)
    }
}

/// What [`Cart::adjust_quantity`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has this quantity.
    Updated(i64),
    /// The quantity dropped to zero or below and the line was removed.
    Removed,
    /// No line with that id.
    NotInCart,
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - At most one line per `id`
/// - Every line has quantity ≥ 1
/// - Insertion order is preserved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds one unit of a menu item.
    ///
    /// ## Behavior
    /// - Id already in cart: quantity += 1, existing snapshot kept
    /// - Otherwise: appended with quantity 1
    pub fn add(
        &mut self,
        id: i64,
        name: impl Into<String>,
        price: Money,
        image: impl Into<String>,
    ) -> ItemAdded {
        let name = name.into();

        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.quantity = item.quantity.saturating_add(1);
            return ItemAdded {
                name,
                quantity: item.quantity,
            };
        }

        self.items.push(CartItem {
            id,
            name: name.clone(),
            price,
            image: image.into(),
            quantity: 1,
        });

        ItemAdded { name, quantity: 1 }
    }

    /// Removes the line for `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != initial_len
    }

    /// Adds `delta` (which may be negative) to the quantity of `id`.
    pub fn adjust_quantity(&mut self, id: i64, delta: i64) -> QuantityChange {
        let Some(pos) = self.items.iter().position(|i| i.id == id) else {
            return QuantityChange::NotInCart;
        };

        let new_qty = self.items[pos].quantity.saturating_add(delta);
        if new_qty <= 0 {
            self.items.remove(pos);
            QuantityChange::Removed
        } else {
            self.items[pos].quantity = new_qty;
            QuantityChange::Updated(new_qty)
        }
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Takes the lines of a placed order out of the cart.
    ///
    /// Each ordered quantity is subtracted from the matching line, so
    /// anything added after `ordered` was snapshotted stays in the cart.
    pub fn remove_ordered(&mut self, ordered: &[CartItem]) {
        if self.items == ordered {
            self.clear();
            return;
        }

        for line in ordered {
            self.adjust_quantity(line.id, -line.quantity.max(0));
        }
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total quantity of all lines.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity.max(0)))
    }

    /// Σ price × quantity, before tax.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Item count and subtotal for the cart badge and the cart page.
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            item_count: self.item_count(),
            subtotal: self.subtotal(),
        }
    }
}

/// Cart totals summary for views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub item_count: i64,
    pub subtotal: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
