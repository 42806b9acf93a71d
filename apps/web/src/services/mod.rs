//! Request-independent services behind the HTTP routes.
//!
//! - [`cart_service`] - cart and service-type changes against the session store
//! - [`order_submitter`] - checkout: token, validation, pricing, persistence

pub mod cart_service;
pub mod order_submitter;

pub use cart_service::CartService;
pub use order_submitter::{OrderSubmitter, RejectionKind, SubmissionOutcome};
