//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bistro-core errors (this file)                                        │
//! │  └── ValidationError  - Order form / cart input failures               │
//! │                                                                         │
//! │  bistro-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Web errors (in app)                                                   │
//! │  └── ApiError         - What JSON clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → one-shot notice on the next view              │
//! │        DbError → logged, generic notice / ApiError                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every variant's `Display` is the exact message a customer sees
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the order form validator and by the explicit parse step that
/// turns raw form fields into typed values. Never carries internal detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank after trimming.
    #[error("Please fill in all required fields. Missing: {field}")]
    Required { field: String },

    /// Phone number is shorter than [`crate::MIN_PHONE_LENGTH`].
    #[error("Please enter a valid phone number.")]
    InvalidPhone,

    /// The cart payload is empty or could not be decoded, or the session
    /// cart itself has no items.
    #[error("Your cart is empty. Please add items before placing an order.")]
    EmptyCart,

    /// Invalid format (non-numeric id, malformed price, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// The checkout token is missing, unknown, or was already used.
    #[error("This checkout has expired or was already submitted. Please review your cart and try again.")]
    CheckoutExpired,
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_message_names_field() {
        let err = ValidationError::required("customer_phone");
        assert_eq!(
            err.to_string(),
            "Please fill in all required fields. Missing: customer_phone"
        );
    }

    #[test]
    fn test_not_allowed_lists_values() {
        let err = ValidationError::NotAllowed {
            field: "service_type".to_string(),
            allowed: vec!["dine-in".to_string(), "take-out".to_string()],
        };
        assert_eq!(err.to_string(), "service_type must be one of: dine-in, take-out");
    }

    #[test]
    fn test_empty_cart_message() {
        assert_eq!(
            ValidationError::EmptyCart.to_string(),
            "Your cart is empty. Please add items before placing an order."
        );
    }
}
