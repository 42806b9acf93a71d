//! # Cart Service
//!
//! Applies cart and service-type changes to a visitor's session.
//!
//! Every change runs inside one [`SessionStore::update`] call.
//! Raw form fields are parsed explicitly here; a malformed id, price or
//! quantity change is a [`ValidationError`], never a silent zero.

use std::sync::Arc;

use bistro_core::cart::{ItemAdded, QuantityChange};
use bistro_core::validation::{parse_integer, sanitize_input};
use bistro_core::{Cart, CartTotals, Money, ServiceType, ValidationError};
use serde::Deserialize;
use tracing::debug;

use crate::session::{Session, SessionId, SessionStore};

/// `POST /cart/add` form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddItemForm {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub item_price: Option<String>,
    pub item_image: Option<String>,
}

/// `POST /cart/remove` form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveItemForm {
    pub item_id: Option<String>,
}

/// `POST /cart/update` form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuantityForm {
    pub item_id: Option<String>,
    pub change: Option<String>,
}

/// `POST /service-type` form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceTypeForm {
    pub service_type: Option<String>,
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, ValidationError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ValidationError::required(field))
}

/// Cart operations keyed by session.
#[derive(Clone)]
pub struct CartService {
    sessions: Arc<dyn SessionStore>,
}

impl CartService {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        CartService { sessions }
    }

    /// The session's cart (empty for a new session).
    pub fn cart(&self, id: SessionId) -> Cart {
        self.sessions.get(id).cart
    }

    pub fn totals(&self, id: SessionId) -> CartTotals {
        self.cart(id).totals()
    }

    /// Adds one unit of the submitted item.
    pub fn add(&self, id: SessionId, form: &AddItemForm) -> Result<ItemAdded, ValidationError> {
        let item_id = parse_integer("item_id", required("item_id", &form.item_id)?)?;
        let name = sanitize_input(required("item_name", &form.item_name)?);
        let price = Money::parse("item_price", required("item_price", &form.item_price)?)?;
        let image = form
            .item_image
            .as_deref()
            .map(sanitize_input)
            .unwrap_or_default();

        debug!(session = %id, item_id, %price, "Adding item to cart");

        let mut quantity = 0;
        self.sessions.update(id, &mut |session: &mut Session| {
            quantity = session.cart.add(item_id, name.as_str(), price, image.as_str()).quantity;
        });

        Ok(ItemAdded { name, quantity })
    }

    /// Removes an item. An id not in the cart is a no-op.
    pub fn remove(&self, id: SessionId, form: &RemoveItemForm) -> Result<bool, ValidationError> {
        let item_id = parse_integer("item_id", required("item_id", &form.item_id)?)?;

        debug!(session = %id, item_id, "Removing item from cart");

        let mut removed = false;
        self.sessions.update(id, &mut |session: &mut Session| {
            removed = session.cart.remove(item_id);
        });
        Ok(removed)
    }

    /// Adjusts an item's quantity by the submitted change.
    pub fn update_quantity(
        &self,
        id: SessionId,
        form: &UpdateQuantityForm,
    ) -> Result<QuantityChange, ValidationError> {
        let item_id = parse_integer("item_id", required("item_id", &form.item_id)?)?;
        let delta = parse_integer("change", required("change", &form.change)?)?;

        debug!(session = %id, item_id, delta, "Adjusting cart quantity");

        let mut change = QuantityChange::NotInCart;
        self.sessions.update(id, &mut |session: &mut Session| {
            change = session.cart.adjust_quantity(item_id, delta);
        });
        Ok(change)
    }

    /// Stores the visitor's service-type preference.
    pub fn set_service_type(
        &self,
        id: SessionId,
        form: &ServiceTypeForm,
    ) -> Result<ServiceType, ValidationError> {
        let raw = sanitize_input(required("service_type", &form.service_type)?);
        let service_type = ServiceType::parse("service_type", &raw)?;

        debug!(session = %id, %service_type, "Setting service type");

        self.sessions.update(id, &mut |session: &mut Session| {
            session.service_type = Some(service_type);
        });

        Ok(service_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn service() -> (CartService, SessionId) {
        (
            CartService::new(Arc::new(MemorySessionStore::new())),
            SessionId::new(),
        )
    }

    fn add_form(id: &str, name: &str, price: &str) -> AddItemForm {
        AddItemForm {
            item_id: Some(id.to_string()),
            item_name: Some(name.to_string()),
            item_price: Some(price.to_string()),
            item_image: Some("/img/x.jpg".to_string()),
        }
    }

    #[test]
    fn test_add_twice_then_totals() {
        let (carts, id) = service();

        carts.add(id, &add_form("1", "Margherita", "10.00")).unwrap();
        let added = carts.add(id, &add_form("1", "Margherita", "10.00")).unwrap();

        assert_eq!(added.message(), "Margherita added to cart!");
        let totals = carts.totals(id);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.subtotal.cents(), 2000);
    }

    #[test]
    fn test_add_sanitizes_name() {
        let (carts, id) = service();
        carts
            .add(id, &add_form("2", "<i>Fish</i> & Chips", "12.50"))
            .unwrap();

        assert_eq!(carts.cart(id).get(2).unwrap().name, "Fish &amp; Chips");
    }

    #[test]
    fn test_malformed_input_rejected_without_change() {
        let (carts, id) = service();

        let err = carts.add(id, &add_form("abc", "Soup", "4.00")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "item_id"));

        let err = carts.add(id, &add_form("3", "Soup", "four")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "item_price"));

        assert!(carts.cart(id).is_empty());
    }

    #[test]
    fn test_update_and_remove() {
        let (carts, id) = service();
        carts.add(id, &add_form("1", "Margherita", "10.00")).unwrap();

        let change = carts
            .update_quantity(
                id,
                &UpdateQuantityForm {
                    item_id: Some("1".to_string()),
                    change: Some("2".to_string()),
                },
            )
            .unwrap();
        assert_eq!(change, QuantityChange::Updated(3));

        let change = carts
            .update_quantity(
                id,
                &UpdateQuantityForm {
                    item_id: Some("1".to_string()),
                    change: Some("-3".to_string()),
                },
            )
            .unwrap();
        assert_eq!(change, QuantityChange::Removed);
        assert!(carts.cart(id).is_empty());

        let removed = carts
            .remove(
                id,
                &RemoveItemForm {
                    item_id: Some("1".to_string()),
                },
            )
            .unwrap();
        assert!(!removed);
    }

    #[test]
    fn test_concurrent_adds_are_all_kept() {
        let (carts, id) = service();

        let workers: Vec<_> = (0..4)
            .map(|n| {
                let carts = carts.clone();
                std::thread::spawn(move || {
                    let form = add_form(&n.to_string(), "Item", "1.00");
                    for _ in 0..50 {
                        carts.add(id, &form).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let cart = carts.cart(id);
        assert_eq!(cart.items().len(), 4);
        assert_eq!(cart.item_count(), 200);
    }

    #[test]
    fn test_set_service_type() {
        let (carts, id) = service();

        let chosen = carts
            .set_service_type(
                id,
                &ServiceTypeForm {
                    service_type: Some("dine-in".to_string()),
                },
            )
            .unwrap();
        assert_eq!(chosen, ServiceType::DineIn);

        let err = carts
            .set_service_type(
                id,
                &ServiceTypeForm {
                    service_type: Some("curbside".to_string()),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }
}
