//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Request Pipeline                               │
//! │                                                                         │
//! │  TraceLayer ──► session_layer ──► handler                              │
//! │                   │                  │                                  │
//! │                   │ Cookie:          ├─ GET  views  ──► JSON            │
//! │                   │ bistro_session   └─ POST forms  ──► notice + 303    │
//! │                   ▼                                                     │
//! │              Extension<SessionId>                                       │
//! │              (+ Set-Cookie when new)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod order;
pub mod views;

use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, Level};

use crate::session::{SessionId, SESSION_COOKIE};
use crate::state::AppState;

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(views::home))
        .route("/menu", get(views::menu))
        .route("/cart", get(views::cart))
        .route("/cart/add", post(cart::add_item))
        .route("/cart/remove", post(cart::remove_item))
        .route("/cart/update", post(cart::update_quantity))
        .route("/service-type", post(cart::set_service_type))
        .route("/orders", post(order::place_order))
        .route("/health", get(views::health))
        .layer(middleware::from_fn(session_layer))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Resolves the session cookie into an `Extension<SessionId>`.
///
/// A missing or unparseable cookie starts a new session, announced with
/// `Set-Cookie` on the response.
async fn session_layer(mut request: Request, next: Next) -> Response {
    let existing = session_from_headers(request.headers());
    let id = existing.unwrap_or_default();
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;

    if existing.is_none() {
        debug!(session = %id, "Starting new session");
        if let Ok(value) = HeaderValue::from_str(&id.cookie()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value))
}
