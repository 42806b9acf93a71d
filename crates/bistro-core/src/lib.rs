//! # bistro-core: Pure Business Logic for Bistro
//!
//! This crate holds the cart, pricing and order validation rules of the
//! ordering system as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/web (axum)                              │   │
//! │  │    /cart/add, /cart/update, /service-type, /orders, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bistro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │  pricing  │  │ validation│  │   money   │  │   │
//! │  │   │   Cart    │  │ compute() │  │  orders   │  │   Money   │  │   │
//! │  │   │ CartItem  │  │OrderTotals│  │ sanitize  │  │  TaxRate  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bistro-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (TaxRate, ServiceType, Order, RestaurantConfig, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Session cart and its line items
//! - [`pricing`] - Subtotal / tax / delivery fee / final total
//! - [`validation`] - Order form validation and input sanitization
//! - [`menu`] - Menu grouping by category
//! - [`order_number`] - Order number generation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bistro_core::cart::Cart;
//! use bistro_core::money::Money;
//! use bistro_core::pricing::{self, PricingConfig};
//! use bistro_core::types::{DeliveryOption, TaxRate};
//!
//! let mut cart = Cart::new();
//! cart.add(1, "Margherita", Money::from_cents(1000), "/img/pizza.jpg");
//! cart.add(1, "Margherita", Money::from_cents(1000), "/img/pizza.jpg");
//!
//! let config = PricingConfig::new(TaxRate::from_bps(850), Money::from_cents(599));
//! let totals = pricing::compute(&cart, &config, DeliveryOption::Pickup);
//!
//! assert_eq!(totals.final_total.cents(), 2170); // $20.00 + $1.70 tax
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod menu;
pub mod money;
pub mod order_number;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals};
pub use error::ValidationError;
pub use money::Money;
pub use pricing::{OrderTotals, PricingConfig};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum length of a sanitized customer phone number.
///
/// Only a minimal format check; no locale-aware phone validation.
pub const MIN_PHONE_LENGTH: usize = 5;
