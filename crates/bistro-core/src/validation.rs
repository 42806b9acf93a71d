//! # Validation Module
//!
//! Order form validation and input sanitization.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Validation                                │
//! │                                                                         │
//! │  OrderRequest (raw form strings)                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  1. Required: name, phone, cart_items, subtotal, tax_amount            │
//! │  2. Sanitize name + phone, phone length ≥ MIN_PHONE_LENGTH             │
//! │  3. cart_items decodes to a non-empty JSON array/object                │
//! │  4. Session cart is non-empty                                          │
//! │  5. Explicit parse: echoed totals, service_type, delivery_option       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  OrderSubmission (typed)  or  Vec<ValidationError> in field order      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::validation::{sanitize_input, validate_phone};
//!
//! assert_eq!(sanitize_input("  <b>Ann</b> & co "), "Ann &amp; co");
//! assert!(validate_phone("123").is_err());
//! ```

use serde::Deserialize;

use crate::cart::Cart;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{DeliveryOption, ServiceType};
use crate::MIN_PHONE_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Raw Request
// =============================================================================

/// The checkout form exactly as submitted.
///
/// Every field is optional text; nothing here is trusted until
/// [`validate_order`] has run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    /// JSON snapshot of the cart as the page rendered it.
    pub cart_items: Option<String>,
    pub subtotal: Option<String>,
    pub tax_amount: Option<String>,
    pub delivery_fee: Option<String>,
    pub final_total: Option<String>,
    pub service_type: Option<String>,
    pub delivery_option: Option<String>,
    pub checkout_token: Option<String>,
}

/// Totals the browser displayed. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTotals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub delivery_fee: Option<Money>,
    pub final_total: Option<Money>,
}

/// A checkout form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    /// Sanitized.
    pub customer_name: String,
    /// Sanitized.
    pub customer_phone: String,
    pub service_type: ServiceType,
    pub delivery_option: DeliveryOption,
    pub client_totals: ClientTotals,
}

// =============================================================================
// Sanitization
// =============================================================================

/// Strips markup tags, trims, then HTML-escapes `& < > " '`.
///
/// A `<` followed by whitespace is text, not a tag. An unclosed tag drops
/// the rest of the input.
pub fn sanitize_input(input: &str) -> String {
    escape_html(strip_tags(input).trim())
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(next) if !next.is_whitespace() => {
                // Skip to the closing '>' (or the end of input).
                for skipped in chars.by_ref() {
                    if skipped == '>' {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a sanitized phone number.
///
/// ## Rules
/// - At least [`MIN_PHONE_LENGTH`] characters
///
/// ## Example
/// ```rust
/// use bistro_core::validation::validate_phone;
///
/// assert!(validate_phone("555-0100").is_ok());
/// assert!(validate_phone("123").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if phone.chars().count() < MIN_PHONE_LENGTH {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Checks that the echoed cart payload decodes to a non-empty JSON array or
/// object. Anything else, including malformed JSON, counts as an empty cart.
pub fn decode_cart_payload(payload: &str) -> ValidationResult<()> {
    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(serde_json::Value::Array(items)) if !items.is_empty() => Ok(()),
        Ok(serde_json::Value::Object(items)) if !items.is_empty() => Ok(()),
        _ => Err(ValidationError::EmptyCart),
    }
}

/// Parses an integer form field (item id, quantity change).
///
/// ## Example
/// ```rust
/// use bistro_core::validation::parse_integer;
///
/// assert_eq!(parse_integer("change", "-1").unwrap(), -1);
/// assert!(parse_integer("item_id", "abc").is_err());
/// ```
pub fn parse_integer(field: &str, input: &str) -> ValidationResult<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::invalid_format(field, "must be a whole number"))
}

/// Returns the trimmed value when present and non-blank.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Order Validation
// =============================================================================

/// Validates the checkout form against the session cart.
///
/// Returns every problem found, in field order. Callers show the first one.
///
/// ## Defaults
/// - `service_type` absent → [`ServiceType::default`]
/// - `delivery_option` absent → [`DeliveryOption::default`]
///
/// Unknown values for either are errors, not defaults.
pub fn validate_order(
    request: &OrderRequest,
    cart: &Cart,
) -> Result<OrderSubmission, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let required = [
        ("customer_name", &request.customer_name),
        ("customer_phone", &request.customer_phone),
        ("cart_items", &request.cart_items),
        ("subtotal", &request.subtotal),
        ("tax_amount", &request.tax_amount),
    ];
    for (field, value) in required {
        if present(value).is_none() {
            errors.push(ValidationError::required(field));
        }
    }

    let customer_name = present(&request.customer_name).map(sanitize_input);
    if customer_name.as_deref() == Some("") {
        errors.push(ValidationError::required("customer_name"));
    }

    let customer_phone = present(&request.customer_phone).map(sanitize_input);
    if let Some(phone) = &customer_phone {
        if let Err(e) = validate_phone(phone) {
            errors.push(e);
        }
    }

    if let Some(payload) = present(&request.cart_items) {
        if let Err(e) = decode_cart_payload(payload) {
            errors.push(e);
        }
    }
    if cart.is_empty() && !errors.contains(&ValidationError::EmptyCart) {
        errors.push(ValidationError::EmptyCart);
    }

    let mut parse_money = |field: &str, value: &Option<String>| -> Option<Money> {
        let raw = present(value)?;
        Money::parse(field, raw).map_err(|e| errors.push(e)).ok()
    };
    let subtotal = parse_money("subtotal", &request.subtotal);
    let tax_amount = parse_money("tax_amount", &request.tax_amount);
    let delivery_fee = parse_money("delivery_fee", &request.delivery_fee);
    let final_total = parse_money("final_total", &request.final_total);

    let service_type = match present(&request.service_type) {
        Some(raw) => ServiceType::parse("service_type", raw)
            .map_err(|e| errors.push(e))
            .ok(),
        None => Some(ServiceType::default()),
    };
    let delivery_option = match present(&request.delivery_option) {
        Some(raw) => DeliveryOption::parse("delivery_option", raw)
            .map_err(|e| errors.push(e))
            .ok(),
        None => Some(DeliveryOption::default()),
    };

    match (
        customer_name,
        customer_phone,
        subtotal,
        tax_amount,
        service_type,
        delivery_option,
    ) {
        (Some(customer_name), Some(customer_phone), Some(subtotal), Some(tax_amount), Some(service_type), Some(delivery_option))
            if errors.is_empty() =>
        {
            Ok(OrderSubmission {
                customer_name,
                customer_phone,
                service_type,
                delivery_option,
                client_totals: ClientTotals {
                    subtotal,
                    tax_amount,
                    delivery_fee,
                    final_total,
                },
            })
        }
        _ => Err(errors),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(1, "Margherita", Money::from_cents(1000), "");
        cart.add(1, "Margherita", Money::from_cents(1000), "");
        cart
    }

    fn request() -> OrderRequest {
        OrderRequest {
            customer_name: Some("Ada".to_string()),
            customer_phone: Some("555-0100".to_string()),
            cart_items: Some(r#"[{"id":1,"name":"Margherita","price":1000,"image":"","quantity":2}]"#.to_string()),
            subtotal: Some("20.00".to_string()),
            tax_amount: Some("1.70".to_string()),
            delivery_fee: None,
            final_total: None,
            service_type: None,
            delivery_option: None,
            checkout_token: None,
        }
    }

    #[test]
    fn test_sanitize_strips_tags_and_escapes() {
        assert_eq!(sanitize_input("  Ada  "), "Ada");
        assert_eq!(sanitize_input("<script>alert(1)</script>Bob"), "alert(1)Bob");
        assert_eq!(sanitize_input("O'Brien \"Jr\""), "O&#039;Brien &quot;Jr&quot;");
        assert_eq!(sanitize_input("Fish & Chips"), "Fish &amp; Chips");
        assert_eq!(sanitize_input("a < b"), "a &lt; b");
        assert_eq!(sanitize_input("cut <here"), "cut");
    }

    #[test]
    fn test_validate_phone_length() {
        assert_eq!(validate_phone("123"), Err(ValidationError::InvalidPhone));
        assert!(validate_phone("12345").is_ok());
    }

    #[test]
    fn test_decode_cart_payload() {
        assert!(decode_cart_payload(r#"[{"id":1}]"#).is_ok());
        assert!(decode_cart_payload(r#"{"0":{"id":1}}"#).is_ok());
        assert_eq!(decode_cart_payload("[]"), Err(ValidationError::EmptyCart));
        assert_eq!(decode_cart_payload("{}"), Err(ValidationError::EmptyCart));
        assert_eq!(decode_cart_payload("not json"), Err(ValidationError::EmptyCart));
        assert_eq!(decode_cart_payload("7"), Err(ValidationError::EmptyCart));
    }

    #[test]
    fn test_valid_order_uses_defaults() {
        let submission = validate_order(&request(), &cart()).unwrap();

        assert_eq!(submission.customer_name, "Ada");
        assert_eq!(submission.service_type, ServiceType::TakeOut);
        assert_eq!(submission.delivery_option, DeliveryOption::Pickup);
        assert_eq!(submission.client_totals.subtotal.cents(), 2000);
        assert_eq!(submission.client_totals.final_total, None);
    }

    #[test]
    fn test_short_phone_rejected() {
        let req = OrderRequest {
            customer_phone: Some("123".to_string()),
            ..request()
        };
        let errors = validate_order(&req, &cart()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidPhone]);
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let req = OrderRequest {
            customer_name: Some("   ".to_string()),
            tax_amount: None,
            ..request()
        };
        let errors = validate_order(&req, &cart()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::required("customer_name"),
                ValidationError::required("tax_amount"),
            ]
        );
        assert_eq!(
            errors[0].to_string(),
            "Please fill in all required fields. Missing: customer_name"
        );
    }

    #[test]
    fn test_name_that_sanitizes_to_nothing_is_missing() {
        let req = OrderRequest {
            customer_name: Some("<b></b>".to_string()),
            ..request()
        };
        let errors = validate_order(&req, &cart()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::required("customer_name")]);
    }

    #[test]
    fn test_empty_cart_payload_rejected() {
        let req = OrderRequest {
            cart_items: Some("[]".to_string()),
            ..request()
        };
        let errors = validate_order(&req, &cart()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyCart]);
    }

    #[test]
    fn test_empty_session_cart_rejected() {
        let errors = validate_order(&request(), &Cart::new()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyCart]);
    }

    #[test]
    fn test_unknown_service_type_rejected() {
        let req = OrderRequest {
            service_type: Some("drive-thru".to_string()),
            delivery_option: Some("delivery".to_string()),
            ..request()
        };
        let errors = validate_order(&req, &cart()).unwrap_err();
        assert!(matches!(errors[0], ValidationError::NotAllowed { ref field, .. } if field == "service_type"));
    }

    #[test]
    fn test_malformed_echoed_total_rejected() {
        let req = OrderRequest {
            subtotal: Some("twenty".to_string()),
            ..request()
        };
        let errors = validate_order(&req, &cart()).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidFormat { ref field, .. } if field == "subtotal"));
    }
}
