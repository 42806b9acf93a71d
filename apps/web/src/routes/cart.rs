//! Cart and service-type form handlers.
//!
//! Each handler applies the change, leaves a notice when there is
//! something to say, and redirects with 303 See Other.

use axum::extract::State;
use axum::response::Redirect;
use axum::{Extension, Form};
use bistro_core::ValidationError;
use tracing::warn;

use crate::services::cart_service::{AddItemForm, RemoveItemForm, ServiceTypeForm, UpdateQuantityForm};
use crate::session::{Notice, NoticeKind, SessionId};
use crate::state::AppState;

fn reject(state: &AppState, id: SessionId, err: ValidationError) {
    warn!(session = %id, error = %err, "Rejected cart change");
    state.sessions.push_notice(id, Notice::error(err.to_string()));
}

/// `POST /cart/add`
pub async fn add_item(
    State(state): State<AppState>,
    Extension(id): Extension<SessionId>,
    Form(form): Form<AddItemForm>,
) -> Redirect {
    match state.carts.add(id, &form) {
        Ok(added) => state
            .sessions
            .push_notice(id, Notice::new(NoticeKind::Cart, added.message())),
        Err(e) => reject(&state, id, e),
    }
    Redirect::to("/menu")
}

/// `POST /cart/remove`
pub async fn remove_item(
    State(state): State<AppState>,
    Extension(id): Extension<SessionId>,
    Form(form): Form<RemoveItemForm>,
) -> Redirect {
    if let Err(e) = state.carts.remove(id, &form) {
        reject(&state, id, e);
    }
    Redirect::to("/cart")
}

/// `POST /cart/update`
pub async fn update_quantity(
    State(state): State<AppState>,
    Extension(id): Extension<SessionId>,
    Form(form): Form<UpdateQuantityForm>,
) -> Redirect {
    if let Err(e) = state.carts.update_quantity(id, &form) {
        reject(&state, id, e);
    }
    Redirect::to("/cart")
}

/// `POST /service-type`
pub async fn set_service_type(
    State(state): State<AppState>,
    Extension(id): Extension<SessionId>,
    Form(form): Form<ServiceTypeForm>,
) -> Redirect {
    match state.carts.set_service_type(id, &form) {
        Ok(service_type) => state.sessions.push_notice(
            id,
            Notice::new(NoticeKind::Service, service_type.selection_notice()),
        ),
        Err(e) => reject(&state, id, e),
    }
    Redirect::to("/menu")
}
