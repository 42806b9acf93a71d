//! # Domain Types
//!
//! Core domain types used throughout Bistro.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │      Order      │   │RestaurantConfig │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (integer)   │   │  order_number   │   │  name           │       │
//! │  │  name           │   │  items (JSON)   │   │  tax_rate       │       │
//! │  │  price          │   │  totals (cents) │   │  delivery_fee   │       │
//! │  │  category       │   │  service_type   │   │  theme          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  ServiceType    │   │ DeliveryOption  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  DineIn         │   │  Pickup         │       │
//! │  │  850 = 8.5%     │   │  TakeOut        │   │  Delivery       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::cart::CartItem;
use crate::error::ValidationError;
use crate::money::{parse_fixed2, Money};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 850 bps = 8.5%, the default restaurant rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Highest accepted rate (100%).
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Parses a percentage string (`"8.5"` → 850 bps) without going
    /// through floating point.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::parse_percentage("tax_rate", "8.5").unwrap().bps(), 850);
    /// assert!(TaxRate::parse_percentage("tax_rate", "-1").is_err());
    /// ```
    pub fn parse_percentage(field: &str, input: &str) -> Result<Self, ValidationError> {
        let bps = parse_fixed2(input).map_err(|reason| ValidationError::invalid_format(field, reason))?;
        u32::try_from(bps)
            .ok()
            .filter(|bps| *bps <= Self::MAX_BPS)
            .map(TaxRate)
            .ok_or_else(|| ValidationError::invalid_format(field, "must be between 0 and 100"))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// `850` displays as `8.5%`, `825` as `8.25%`, `1000` as `10%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Service Type
// =============================================================================

/// How the customer will eat the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    /// Eat at the restaurant.
    DineIn,
    /// Collect and leave.
    #[default]
    TakeOut,
}

impl ServiceType {
    pub const ALL: [ServiceType; 2] = [ServiceType::DineIn, ServiceType::TakeOut];

    /// Wire value stored in the session and the orders table.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ServiceType::DineIn => "dine-in",
            ServiceType::TakeOut => "take-out",
        }
    }

    /// Human label ("Dine In").
    pub const fn label(&self) -> &'static str {
        match self {
            ServiceType::DineIn => "Dine In",
            ServiceType::TakeOut => "Take Out",
        }
    }

    /// Notice shown after the customer picks this service type.
    pub const fn selection_notice(&self) -> &'static str {
        match self {
            ServiceType::DineIn => "Dine In selected! Enjoy our cozy atmosphere.",
            ServiceType::TakeOut => "Take Out selected! Quick and convenient.",
        }
    }

    /// Parses a wire value; anything unknown is rejected rather than
    /// defaulted.
    pub fn parse(field: &str, input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|value| value.as_str() == input)
            .ok_or_else(|| not_allowed(field, Self::ALL.iter().map(|v| v.as_str())))
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Delivery Option
// =============================================================================

/// Whether the order is collected or brought to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryOption {
    #[default]
    Pickup,
    /// Adds the configured delivery fee.
    Delivery,
}

impl DeliveryOption {
    pub const ALL: [DeliveryOption; 2] = [DeliveryOption::Pickup, DeliveryOption::Delivery];

    pub const fn as_str(&self) -> &'static str {
        match self {
            DeliveryOption::Pickup => "pickup",
            DeliveryOption::Delivery => "delivery",
        }
    }

    pub fn parse(field: &str, input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|value| value.as_str() == input)
            .ok_or_else(|| not_allowed(field, Self::ALL.iter().map(|v| v.as_str())))
    }
}

impl fmt::Display for DeliveryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn not_allowed<'a>(field: &str, allowed: impl Iterator<Item = &'a str>) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        allowed: allowed.map(str::to_string).collect(),
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    /// Catalog id; carried by the add-to-cart form.
    pub id: i64,

    pub name: String,

    pub description: Option<String>,

    pub price: Money,

    pub image_url: Option<String>,

    /// Category key (`appetizers`, `mains`, `desserts`, ...).
    pub category: String,

    /// Unavailable items are hidden from the menu.
    pub is_available: bool,
}

/// Shown for menu items without their own picture.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=500&h=350&fit=crop";

impl MenuItem {
    /// The item's picture, or [`DEFAULT_IMAGE_URL`].
    pub fn display_image(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_IMAGE_URL)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A persisted customer order.
///
/// ## Lifecycle
/// Written once by a successful checkout and never updated or deleted.
/// The money fields are the server-computed totals, never the values the
/// browser echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    /// Human-readable unique number (`ORD20250101120000-0001`).
    pub order_number: String,

    pub customer_name: String,

    pub customer_phone: String,

    /// Snapshot of the session cart at submission.
    pub items: Vec<CartItem>,

    pub subtotal: Money,

    pub tax_amount: Money,

    pub delivery_fee: Money,

    pub final_total: Money,

    pub service_type: ServiceType,

    pub delivery_option: DeliveryOption,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Restaurant Configuration
// =============================================================================

/// Brand colors used by the ordering pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub background_color: String,
    pub accent_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            primary_color: "#ea580c".to_string(),
            secondary_color: "#ffffff".to_string(),
            text_color: "#1f2937".to_string(),
            background_color: "#f9fafb".to_string(),
            accent_color: "#10b981".to_string(),
        }
    }
}

/// Restaurant-wide settings: name, pricing inputs and branding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RestaurantConfig {
    pub restaurant_name: String,
    pub tax_rate: TaxRate,
    pub delivery_fee: Money,
    pub theme: Theme,
}

impl RestaurantConfig {
    /// Settings used when no configuration row exists.
    pub fn fallback() -> Self {
        RestaurantConfig {
            restaurant_name: "MODERN FOODS".to_string(),
            tax_rate: TaxRate::from_bps(850),
            delivery_fee: Money::from_cents(599),
            theme: Theme::default(),
        }
    }
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        RestaurantConfig::fallback()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
