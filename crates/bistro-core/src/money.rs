//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing a cart of float prices and then adding float tax compounds    │
//! │  the error at every step.                                               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Prices are parsed from their decimal text straight into cents,      │
//! │    subtotals are exact, and tax is rounded exactly once.               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::money::Money;
//!
//! let price = Money::parse("item_price", "10.99").unwrap();
//! assert_eq!(price.cents(), 1099);
//!
//! let doubled = price * 2i64;
//! assert_eq!(doubled.to_string(), "$21.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a client-influenced price snapshot may be negative;
///   pricing clamps it instead of the parser hiding it
/// - **Single field tuple struct**: serializes as a plain integer of cents
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Menu price ──► CartItem.price (snapshot) ──► line total               │
/// │                                                    │                    │
/// │                                                    ▼                    │
/// │  subtotal ──► tax ──► + delivery fee ──► final_total ──► orders row    │
/// │                                                                         │
/// │  Display ("$12.34") happens only when a value is presented             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount such as `"10.99"`, `"5"` or `"1.7"`.
    ///
    /// ## Rules
    /// - Optional leading sign, ASCII digits, at most one `.`
    /// - Digits beyond the second decimal place are rounded half away from
    ///   zero (client-echoed totals such as `"1.6983"` stay acceptable)
    /// - Anything else is an `InvalidFormat` error naming `field`
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// assert_eq!(Money::parse("price", "5.99").unwrap().cents(), 599);
    /// assert_eq!(Money::parse("price", "1.6983").unwrap().cents(), 170);
    /// assert!(Money::parse("price", "abc").is_err());
    /// ```
    pub fn parse(field: &str, input: &str) -> Result<Money, ValidationError> {
        parse_fixed2(input)
            .map(Money)
            .map_err(|reason| ValidationError::invalid_format(field, reason))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the value, or zero when it is negative.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Adds two amounts, saturating at the numeric bounds.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Multiplies by a quantity, saturating at the numeric bounds.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Calculates tax, rounding half away from zero to the nearest cent.
    ///
    /// ## Implementation
    /// The product `amount × bps` is carried in i128 at full precision and
    /// divided by 10000 exactly once, so the only rounding in an order's
    /// totals happens here.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    /// use bistro_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(2000); // $20.00
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(850)); // 8.5%
    /// assert_eq!(tax.cents(), 170);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let product = self.0 as i128 * rate.bps() as i128;
        let rounded = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        Money(i64::try_from(rounded).unwrap_or(if rounded > 0 { i64::MAX } else { i64::MIN }))
    }
}

/// Parses `[+-]digits[.digits]` into a value scaled by 100.
///
/// Shared by [`Money::parse`] and [`TaxRate::parse_percentage`], both of
/// which are fixed-point with two decimal places.
pub(crate) fn parse_fixed2(input: &str) -> Result<i64, &'static str> {
    const NOT_DECIMAL: &str = "must be a decimal number";
    const TOO_LARGE: &str = "is too large";

    let s = input.trim();
    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    if whole.is_empty() && frac.is_empty() {
        return Err(NOT_DECIMAL);
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NOT_DECIMAL);
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| TOO_LARGE)?
    };

    let frac_digits = frac.as_bytes();
    let digit = |i: usize| frac_digits.get(i).map(|b| (b - b'0') as i64).unwrap_or(0);
    let mut frac_value = digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        frac_value += 1;
    }

    let scaled = whole_value
        .checked_mul(100)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or(TOO_LARGE)?;

    Ok(if negative { -scaled } else { scaled })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money the way the ordering pages present it: `$12.34`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc.saturating_add(m))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_parse_plain_amounts() {
        assert_eq!(Money::parse("p", "10.99").unwrap().cents(), 1099);
        assert_eq!(Money::parse("p", "5").unwrap().cents(), 500);
        assert_eq!(Money::parse("p", "1.7").unwrap().cents(), 170);
        assert_eq!(Money::parse("p", " 20.00 ").unwrap().cents(), 2000);
        assert_eq!(Money::parse("p", ".5").unwrap().cents(), 50);
        assert_eq!(Money::parse("p", "-3.25").unwrap().cents(), -325);
    }

    #[test]
    fn test_parse_rounds_extra_precision_once() {
        // 8.5% of $19.98 echoed by a browser as 1.6983
        assert_eq!(Money::parse("tax_amount", "1.6983").unwrap().cents(), 170);
        assert_eq!(Money::parse("tax_amount", "1.6949").unwrap().cents(), 169);
        assert_eq!(Money::parse("tax_amount", "0.995").unwrap().cents(), 100);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "abc", "1,50", "1.2.3", "$5", "-", "."] {
            let err = Money::parse("item_price", bad).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "item_price"),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_tax_calculation_exact() {
        let subtotal = Money::from_cents(2000);
        assert_eq!(subtotal.calculate_tax(TaxRate::from_bps(850)).cents(), 170);
    }

    #[test]
    fn test_tax_calculation_rounds_half_up() {
        // $10.00 at 8.25% = $0.825 → $0.83
        let amount = Money::from_cents(1000);
        assert_eq!(amount.calculate_tax(TaxRate::from_bps(825)).cents(), 83);
        // $19.98 at 8.5% = $1.6983 → $1.70
        let amount = Money::from_cents(1998);
        assert_eq!(amount.calculate_tax(TaxRate::from_bps(850)).cents(), 170);
    }

    #[test]
    fn test_clamp_and_saturation() {
        assert_eq!(Money::from_cents(-100).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_cents(100).clamp_non_negative().cents(), 100);
        assert_eq!(Money::from_cents(i64::MAX).multiply_quantity(2).cents(), i64::MAX);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 5].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 355);
    }
}
