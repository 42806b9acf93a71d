//! # Pricing
//!
//! Turns a cart, the restaurant's pricing settings and the chosen delivery
//! option into the monetary breakdown of an order.
//!
//! ```text
//!   subtotal     = Σ price × quantity          (exact, cents)
//!   tax_amount   = subtotal × tax_rate          (rounded once, half-up)
//!   delivery_fee = fee if delivery, else 0
//!   final_total  = subtotal + tax_amount + delivery_fee
//! ```
//!
//! The browser shows the same numbers, but checkout always recomputes them
//! here from the session cart.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::Money;
use crate::types::{DeliveryOption, RestaurantConfig, TaxRate};

/// The two restaurant settings that affect price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    pub tax_rate: TaxRate,
    pub delivery_fee: Money,
}

impl PricingConfig {
    pub const fn new(tax_rate: TaxRate, delivery_fee: Money) -> Self {
        PricingConfig {
            tax_rate,
            delivery_fee,
        }
    }
}

impl From<&RestaurantConfig> for PricingConfig {
    fn from(config: &RestaurantConfig) -> Self {
        PricingConfig::new(config.tax_rate, config.delivery_fee)
    }
}

/// Monetary breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub delivery_fee: Money,
    pub final_total: Money,
}

/// Computes the order totals for `cart`.
///
/// Pure and deterministic. Lines with a negative price or quantity count as
/// zero; a negative configured delivery fee is treated as free delivery.
pub fn compute(cart: &Cart, config: &PricingConfig, delivery: DeliveryOption) -> OrderTotals {
    let subtotal = cart.subtotal();
    let tax_amount = subtotal.calculate_tax(config.tax_rate);
    let delivery_fee = match delivery {
        DeliveryOption::Delivery => config.delivery_fee.clamp_non_negative(),
        DeliveryOption::Pickup => Money::zero(),
    };

    OrderTotals {
        subtotal,
        tax_amount,
        delivery_fee,
        final_total: subtotal.saturating_add(tax_amount).saturating_add(delivery_fee),
    }
}
