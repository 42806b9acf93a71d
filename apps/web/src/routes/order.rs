//! Checkout handler.

use axum::extract::State;
use axum::response::Redirect;
use axum::{Extension, Form};
use bistro_core::validation::OrderRequest;
use bistro_core::PricingConfig;
use tracing::error;

use crate::services::order_submitter::PERSISTENCE_FAILED_MESSAGE;
use crate::session::{Notice, SessionId};
use crate::state::AppState;

/// `POST /orders`
///
/// Confirmed orders land on `/`; rejected ones go back to `/cart` with the
/// reason as an error notice.
pub async fn place_order(
    State(state): State<AppState>,
    Extension(id): Extension<SessionId>,
    Form(request): Form<OrderRequest>,
) -> Redirect {
    let config = match state.db.restaurant_config().current().await {
        Ok(config) => config,
        Err(e) => {
            error!(session = %id, error = %e, "Failed to load restaurant config for checkout");
            state
                .sessions
                .push_notice(id, Notice::error(PERSISTENCE_FAILED_MESSAGE));
            return Redirect::to("/cart");
        }
    };

    let outcome = state
        .orders
        .submit(id, &request, &PricingConfig::from(&config))
        .await;
    state.sessions.push_notice(id, outcome.notice());

    if outcome.is_confirmed() {
        Redirect::to("/")
    } else {
        Redirect::to("/cart")
    }
}
