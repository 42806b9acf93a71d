//! # View Routes
//!
//! JSON view models for the pages a frontend renders. Every view drains the
//! session's pending notices, so each notice is shown exactly once.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use bistro_core::menu::{self, MenuCategory};
use bistro_core::pricing::{self, OrderTotals, PricingConfig};
use bistro_core::{
    CartItem, CartTotals, DeliveryOption, MenuItem, RestaurantConfig, ServiceType, TaxRate,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::session::{Notice, SessionId};
use crate::state::AppState;

/// `GET /`
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub restaurant: RestaurantConfig,
    pub service_type: Option<ServiceType>,
    pub cart_count: i64,
    pub notices: Vec<Notice>,
}

/// A menu item with the picture the page shows for it.
#[derive(Debug, Serialize)]
pub struct MenuEntry {
    #[serde(flatten)]
    pub item: MenuItem,
    /// `image_url`, or the default picture. Also posted back by "Add to cart".
    pub image: String,
}

impl From<MenuItem> for MenuEntry {
    fn from(item: MenuItem) -> Self {
        MenuEntry {
            image: item.display_image().to_string(),
            item,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MenuSection {
    pub key: String,
    pub title: String,
    pub items: Vec<MenuEntry>,
}

impl From<MenuCategory> for MenuSection {
    fn from(category: MenuCategory) -> Self {
        MenuSection {
            key: category.key,
            title: category.title,
            items: category.items.into_iter().map(MenuEntry::from).collect(),
        }
    }
}

/// `GET /menu`
#[derive(Debug, Serialize)]
pub struct MenuView {
    pub restaurant_name: String,
    pub categories: Vec<MenuSection>,
    pub service_type: Option<ServiceType>,
    pub cart_count: i64,
    pub notices: Vec<Notice>,
}

/// `GET /cart`
///
/// Totals are given for both delivery options so the page can switch
/// between them without a round trip.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
    pub pickup: OrderTotals,
    pub delivery: OrderTotals,
    pub tax_rate: TaxRate,
    pub service_type: Option<ServiceType>,
    /// Must be echoed by the checkout form.
    pub checkout_token: String,
    pub notices: Vec<Notice>,
}

pub async fn home(
    State(state): State<AppState>,
    Extension(id): Extension<SessionId>,
) -> Result<Json<HomeView>, ApiError> {
    let restaurant = state.db.restaurant_config().current().await?;
    let session = state.sessions.get(id);

    Ok(Json(HomeView {
        restaurant,
        service_type: session.service_type,
        cart_count: session.cart.item_count(),
        notices: state.sessions.take_notices(id),
    }))
}

pub async fn menu(
    State(state): State<AppState>,
    Extension(id): Extension<SessionId>,
) -> Result<Json<MenuView>, ApiError> {
    let restaurant = state.db.restaurant_config().current().await?;
    let items = state.db.menu().list_available().await?;
    let session = state.sessions.get(id);

    Ok(Json(MenuView {
        restaurant_name: restaurant.restaurant_name,
        categories: menu::group_by_category(items)
            .into_iter()
            .map(MenuSection::from)
            .collect(),
        service_type: session.service_type,
        cart_count: session.cart.item_count(),
        notices: state.sessions.take_notices(id),
    }))
}

pub async fn cart(
    State(state): State<AppState>,
    Extension(id): Extension<SessionId>,
) -> Result<Json<CartView>, ApiError> {
    let restaurant = state.db.restaurant_config().current().await?;
    let pricing_config = PricingConfig::from(&restaurant);

    let checkout_token = state.sessions.issue_checkout_token(id);
    let session = state.sessions.get(id);
    let cart = &session.cart;

    Ok(Json(CartView {
        items: cart.items().to_vec(),
        totals: cart.totals(),
        pickup: pricing::compute(cart, &pricing_config, DeliveryOption::Pickup),
        delivery: pricing::compute(cart, &pricing_config, DeliveryOption::Delivery),
        tax_rate: restaurant.tax_rate,
        service_type: session.service_type,
        checkout_token,
        notices: state.sessions.take_notices(id),
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.db.health_check().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
    }
}
