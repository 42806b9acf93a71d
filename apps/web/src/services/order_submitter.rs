//! # Order Submitter
//!
//! Turns a checkout form into a persisted order.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       One Checkout Attempt                              │
//! │                                                                         │
//! │  Draft                                                                 │
//! │    │  take_checkout_token ── missing / mismatch ──► Rejected           │
//! │    ▼                                                                    │
//! │  Validating                                                            │
//! │    │  validate_order ─────── first error ─────────► Rejected           │
//! │    │  pricing::compute (session cart, server config)                   │
//! │    │  client totals compared, mismatch only logged                     │
//! │    │  db.orders().insert ─── DbError ─────────────► Rejected           │
//! │    ▼                                                                    │
//! │  Confirmed: ordered lines leave the cart, token stays consumed         │
//! │                                                                         │
//! │  Every Rejected path puts the token back and leaves the cart alone.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use bistro_core::order_number::OrderNumberGenerator;
use bistro_core::pricing::{self, OrderTotals, PricingConfig};
use bistro_core::validation::{self, ClientTotals, OrderRequest};
use bistro_core::{Order, ValidationError};
use bistro_db::{Database, DbError};
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::session::{Notice, NoticeKind, Session, SessionId, SessionStore};

/// Message shown when the order could not be stored.
pub const PERSISTENCE_FAILED_MESSAGE: &str = "Failed to place order. Please try again.";

/// Attempts at a fresh order number when one collides with a stored order.
const MAX_ORDER_NUMBER_ATTEMPTS: usize = 3;

/// Why a checkout was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// Missing, stale or reused checkout token.
    CheckoutExpired,
    /// A form field or the cart failed validation.
    Validation,
    /// The order could not be written.
    Persistence,
}

/// Result of one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Confirmed {
        order_number: String,
        totals: OrderTotals,
    },
    Rejected {
        reason: String,
        kind: RejectionKind,
    },
}

impl SubmissionOutcome {
    fn rejected(kind: RejectionKind, reason: impl Into<String>) -> Self {
        SubmissionOutcome::Rejected {
            reason: reason.into(),
            kind,
        }
    }

    /// The notice to show on the next view.
    pub fn notice(&self) -> Notice {
        match self {
            SubmissionOutcome::Confirmed { order_number, .. } => Notice::new(
                NoticeKind::Success,
                format!("Order placed successfully! Your order number is: {}", order_number),
            ),
            SubmissionOutcome::Rejected { reason, .. } => Notice::error(reason.clone()),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmissionOutcome::Confirmed { .. })
    }
}

/// Orchestrates validation, pricing and persistence of an order.
#[derive(Clone)]
pub struct OrderSubmitter {
    sessions: Arc<dyn SessionStore>,
    db: Database,
    numbers: Arc<OrderNumberGenerator>,
}

impl OrderSubmitter {
    pub fn new(sessions: Arc<dyn SessionStore>, db: Database) -> Self {
        OrderSubmitter {
            sessions,
            db,
            numbers: Arc::new(OrderNumberGenerator::new()),
        }
    }

    /// Runs one checkout attempt for the session.
    pub async fn submit(
        &self,
        session_id: SessionId,
        request: &OrderRequest,
        pricing_config: &PricingConfig,
    ) -> SubmissionOutcome {
        debug!(session = %session_id, "Checkout submitted");

        let token = request
            .checkout_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let Some(token) = token.filter(|t| self.sessions.take_checkout_token(session_id, t)) else {
            warn!(session = %session_id, "Checkout token missing or already used");
            return SubmissionOutcome::rejected(
                RejectionKind::CheckoutExpired,
                ValidationError::CheckoutExpired.to_string(),
            );
        };

        let outcome = self.place(session_id, request, pricing_config).await;

        if !outcome.is_confirmed() {
            self.sessions.restore_checkout_token(session_id, token);
        }

        outcome
    }

    async fn place(
        &self,
        session_id: SessionId,
        request: &OrderRequest,
        pricing_config: &PricingConfig,
    ) -> SubmissionOutcome {
        let session = self.sessions.get(session_id);

        // An absent service type falls back to the visitor's stored preference.
        let request = match (&request.service_type, session.service_type) {
            (Some(raw), _) if !raw.trim().is_empty() => request.clone(),
            (_, Some(preferred)) => OrderRequest {
                service_type: Some(preferred.as_str().to_string()),
                ..request.clone()
            },
            _ => request.clone(),
        };

        let submission = match validation::validate_order(&request, &session.cart) {
            Ok(submission) => submission,
            Err(errors) => {
                let reason = errors
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| ValidationError::EmptyCart.to_string());
                debug!(session = %session_id, %reason, "Checkout failed validation");
                return SubmissionOutcome::rejected(RejectionKind::Validation, reason);
            }
        };

        let totals = pricing::compute(&session.cart, pricing_config, submission.delivery_option);
        log_client_mismatch(session_id, &submission.client_totals, &totals);

        let mut order = Order {
            order_number: String::new(),
            customer_name: submission.customer_name,
            customer_phone: submission.customer_phone,
            items: session.cart.items().to_vec(),
            subtotal: totals.subtotal,
            tax_amount: totals.tax_amount,
            delivery_fee: totals.delivery_fee,
            final_total: totals.final_total,
            service_type: submission.service_type,
            delivery_option: submission.delivery_option,
            created_at: Utc::now(),
        };

        let mut attempt = 1;
        loop {
            order.order_number = self.numbers.next(order.created_at);

            match self.db.orders().insert(&order).await {
                Ok(_) => break,
                Err(DbError::UniqueViolation { .. }) if attempt < MAX_ORDER_NUMBER_ATTEMPTS => {
                    warn!(order_number = %order.order_number, attempt, "Order number collision, retrying");
                    attempt += 1;
                }
                Err(e) => {
                    error!(session = %session_id, error = %e, "Failed to persist order");
                    return SubmissionOutcome::rejected(
                        RejectionKind::Persistence,
                        PERSISTENCE_FAILED_MESSAGE,
                    );
                }
            }
        }

        // Lines added while the insert was in flight are not part of this order.
        self.sessions.update(session_id, &mut |session: &mut Session| {
            session.cart.remove_ordered(&order.items);
        });

        info!(
            order_number = %order.order_number,
            final_total = %order.final_total,
            service_type = %order.service_type,
            delivery_option = %order.delivery_option,
            "Order placed"
        );

        SubmissionOutcome::Confirmed {
            order_number: order.order_number,
            totals,
        }
    }
}

/// Client totals are display echoes; the server figures always win.
fn log_client_mismatch(session_id: SessionId, client: &ClientTotals, server: &OrderTotals) {
    let mismatched = client.subtotal != server.subtotal
        || client.tax_amount != server.tax_amount
        || client.delivery_fee.is_some_and(|fee| fee != server.delivery_fee)
        || client.final_total.is_some_and(|total| total != server.final_total);

    if mismatched {
        warn!(
            session = %session_id,
            client_subtotal = %client.subtotal,
            server_subtotal = %server.subtotal,
            client_tax = %client.tax_amount,
            server_tax = %server.tax_amount,
            server_final_total = %server.final_total,
            "Client totals differ from server totals"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use bistro_core::{DeliveryOption, Money, TaxRate};
    use bistro_db::DbConfig;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Fixture {
        sessions: Arc<MemorySessionStore>,
        submitter: OrderSubmitter,
        db: Database,
        id: SessionId,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sessions = Arc::new(MemorySessionStore::new());
        let submitter = OrderSubmitter::new(sessions.clone(), db.clone());
        let id = SessionId::new();

        sessions.update(id, &mut |session: &mut Session| {
            session.cart.add(1, "Margherita", Money::from_cents(1000), "");
            session.cart.add(1, "Margherita", Money::from_cents(1000), "");
        });

        Fixture {
            sessions,
            submitter,
            db,
            id,
        }
    }

    fn pricing() -> PricingConfig {
        PricingConfig::new(TaxRate::from_bps(850), Money::from_cents(599))
    }

    fn request(token: &str) -> OrderRequest {
        OrderRequest {
            customer_name: Some("Ada".to_string()),
            customer_phone: Some("555-0100".to_string()),
            cart_items: Some(r#"[{"id":1,"quantity":2}]"#.to_string()),
            subtotal: Some("20.00".to_string()),
            tax_amount: Some("1.70".to_string()),
            checkout_token: Some(token.to_string()),
            ..OrderRequest::default()
        }
    }

    #[tokio::test]
    async fn test_confirmed_order_is_persisted_and_cart_cleared() {
        let f = fixture().await;
        let token = f.sessions.issue_checkout_token(f.id);

        let outcome = f.submitter.submit(f.id, &request(&token), &pricing()).await;

        let SubmissionOutcome::Confirmed { order_number, totals } = outcome else {
            panic!("expected confirmation, got {outcome:?}");
        };
        assert_eq!(totals.final_total.cents(), 2170);
        assert!(f.sessions.get(f.id).cart.is_empty());
        assert_eq!(f.sessions.get(f.id).checkout_token, None);

        let stored = f.db.orders().get_by_number(&order_number).await.unwrap().unwrap();
        assert_eq!(stored.final_total.cents(), 2170);
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_server_totals_ignore_client_values() {
        let f = fixture().await;
        let token = f.sessions.issue_checkout_token(f.id);
        let req = OrderRequest {
            subtotal: Some("0.01".to_string()),
            tax_amount: Some("0.00".to_string()),
            delivery_fee: Some("0".to_string()),
            final_total: Some("0.01".to_string()),
            delivery_option: Some("delivery".to_string()),
            ..request(&token)
        };

        let outcome = f.submitter.submit(f.id, &req, &pricing()).await;

        let SubmissionOutcome::Confirmed { order_number, .. } = outcome else {
            panic!("expected confirmation, got {outcome:?}");
        };
        let stored = f.db.orders().get_by_number(&order_number).await.unwrap().unwrap();
        assert_eq!(stored.delivery_option, DeliveryOption::Delivery);
        assert_eq!(stored.delivery_fee.cents(), 599);
        assert_eq!(stored.final_total.cents(), 2769);
    }

    #[tokio::test]
    async fn test_reused_token_rejected() {
        let f = fixture().await;
        let token = f.sessions.issue_checkout_token(f.id);

        assert!(f.submitter.submit(f.id, &request(&token), &pricing()).await.is_confirmed());

        // Refill the cart and replay the same form.
        f.sessions.update(f.id, &mut |session: &mut Session| {
            session.cart.add(1, "Margherita", Money::from_cents(1000), "");
        });

        let outcome = f.submitter.submit(f.id, &request(&token), &pricing()).await;
        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected { kind: RejectionKind::CheckoutExpired, .. }
        ));
        assert_eq!(f.db.orders().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_cart_and_token() {
        let f = fixture().await;
        let token = f.sessions.issue_checkout_token(f.id);
        let req = OrderRequest {
            customer_phone: Some("123".to_string()),
            ..request(&token)
        };

        let outcome = f.submitter.submit(f.id, &req, &pricing()).await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected {
                reason: "Please enter a valid phone number.".to_string(),
                kind: RejectionKind::Validation,
            }
        );
        assert_eq!(f.sessions.get(f.id).cart.totals().item_count, 2);
        assert_eq!(f.sessions.get(f.id).checkout_token, Some(token));
        assert_eq!(f.db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_cart() {
        let f = fixture().await;
        let token = f.sessions.issue_checkout_token(f.id);
        f.db.close().await;

        let outcome = f.submitter.submit(f.id, &request(&token), &pricing()).await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected {
                reason: PERSISTENCE_FAILED_MESSAGE.to_string(),
                kind: RejectionKind::Persistence,
            }
        );
        assert_eq!(f.sessions.get(f.id).cart.totals().item_count, 2);
        assert_eq!(f.sessions.get(f.id).checkout_token, Some(token));
    }

    #[tokio::test]
    async fn test_service_type_defaults_to_session_preference() {
        let f = fixture().await;
        f.sessions.update(f.id, &mut |session: &mut Session| {
            session.service_type = Some(bistro_core::ServiceType::DineIn);
        });
        let token = f.sessions.issue_checkout_token(f.id);

        let outcome = f.submitter.submit(f.id, &request(&token), &pricing()).await;

        let SubmissionOutcome::Confirmed { order_number, .. } = outcome else {
            panic!("expected confirmation, got {outcome:?}");
        };
        let stored = f.db.orders().get_by_number(&order_number).await.unwrap().unwrap();
        assert_eq!(stored.service_type, bistro_core::ServiceType::DineIn);
    }

    /// Adds a Tiramisu right after the first snapshot read, as a second tab
    /// would while the order is being written.
    struct AddsDuringCheckout {
        inner: MemorySessionStore,
        fired: AtomicBool,
    }

    impl SessionStore for AddsDuringCheckout {
        fn get(&self, id: SessionId) -> Session {
            let snapshot = self.inner.get(id);
            if !self.fired.swap(true, Ordering::SeqCst) {
                self.inner.update(id, &mut |session: &mut Session| {
                    session.cart.add(4, "Tiramisu", Money::from_cents(650), "");
                });
            }
            snapshot
        }

        fn update(&self, id: SessionId, f: &mut dyn FnMut(&mut Session)) {
            self.inner.update(id, f)
        }

        fn clear(&self, id: SessionId) {
            self.inner.clear(id)
        }
    }

    #[tokio::test]
    async fn test_lines_added_during_checkout_stay_in_cart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sessions = Arc::new(AddsDuringCheckout {
            inner: MemorySessionStore::new(),
            fired: AtomicBool::new(false),
        });
        let submitter = OrderSubmitter::new(sessions.clone(), db.clone());
        let id = SessionId::new();
        sessions.update(id, &mut |session: &mut Session| {
            session.cart.add(1, "Margherita", Money::from_cents(1000), "");
            session.cart.add(1, "Margherita", Money::from_cents(1000), "");
        });
        let token = sessions.issue_checkout_token(id);

        let outcome = submitter.submit(id, &request(&token), &pricing()).await;

        let SubmissionOutcome::Confirmed { order_number, .. } = outcome else {
            panic!("expected confirmation, got {outcome:?}");
        };
        let stored = db.orders().get_by_number(&order_number).await.unwrap().unwrap();
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].id, 1);

        let cart = sessions.inner.get(id).cart;
        assert!(cart.get(1).is_none());
        assert_eq!(cart.get(4).unwrap().quantity, 1);
    }

    #[test]
    fn test_notice_messages() {
        let confirmed = SubmissionOutcome::Confirmed {
            order_number: "ORD20250101120000-0001".to_string(),
            totals: pricing::compute(&bistro_core::Cart::new(), &pricing(), DeliveryOption::Pickup),
        };
        assert_eq!(
            confirmed.notice().message,
            "Order placed successfully! Your order number is: ORD20250101120000-0001"
        );
        assert_eq!(confirmed.notice().kind, NoticeKind::Success);
    }
}
