//! Shared application state handed to every route.

use std::sync::Arc;

use bistro_db::Database;

use crate::services::{CartService, OrderSubmitter};
use crate::session::SessionStore;

/// State cloned into each handler by axum.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: Arc<dyn SessionStore>,
    pub carts: CartService,
    pub orders: OrderSubmitter,
}

impl AppState {
    pub fn new(db: Database, sessions: Arc<dyn SessionStore>) -> Self {
        AppState {
            carts: CartService::new(sessions.clone()),
            orders: OrderSubmitter::new(sessions.clone(), db.clone()),
            db,
            sessions,
        }
    }
}
