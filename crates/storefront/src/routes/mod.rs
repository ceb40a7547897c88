//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//!
//! # Cart
//! GET    /api/cart                        - Cart with totals and panel state
//! DELETE /api/cart                        - Clear cart
//! POST   /api/cart/items                  - Add product (+ notification)
//! PATCH  /api/cart/items/{id}             - Set quantity (<= 0 removes)
//! DELETE /api/cart/items/{id}             - Remove line
//! POST   /api/cart/open                   - Open cart panel
//! POST   /api/cart/close                  - Close cart panel
//! POST   /api/cart/toggle                 - Toggle cart panel
//!
//! # Checkout
//! GET    /api/checkout/summary            - Subtotal, savings, shipping, total
//!
//! # Wishlist
//! GET    /api/wishlist                    - Saved products
//! DELETE /api/wishlist                    - Clear wishlist
//! POST   /api/wishlist/items              - Save product (idempotent)
//! DELETE /api/wishlist/items/{id}         - Remove saved product
//! POST   /api/wishlist/toggle             - Toggle saved state (+ notification)
//!
//! # Compare
//! GET    /api/compare                     - Compared products
//! POST   /api/compare                     - Add product ({success, message})
//! DELETE /api/compare                     - Clear comparison
//! DELETE /api/compare/items/{product_id}  - Remove product
//! POST   /api/compare/toggle              - Toggle product (+ notification)
//!
//! # Notifications
//! GET    /api/notifications               - Live notifications
//! POST   /api/notifications               - Push a notification
//! DELETE /api/notifications               - Clear all
//! DELETE /api/notifications/{id}          - Dismiss one
//! ```

pub mod cart;
pub mod checkout;
pub mod compare;
pub mod notifications;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use marche_core::{Priced, format_fcfa};
use serde::Serialize;

use crate::state::AppState;

/// A cart line, saved product or compared product with its display pricing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView<T> {
    #[serde(flatten)]
    pub item: T,
    pub price_display: String,
    pub discount_percentage: u32,
}

impl<T: Priced + Clone> ItemView<T> {
    #[must_use]
    pub fn of(item: &T) -> Self {
        Self {
            price_display: format_fcfa(item.unit_price()),
            discount_percentage: item.discount_percentage(),
            item: item.clone(),
        }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{id}",
            patch(cart::update).delete(cart::remove),
        )
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/toggle", post(cart::toggle))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).delete(wishlist::clear))
        .route("/items", post(wishlist::add))
        .route("/items/{id}", delete(wishlist::remove))
        .route("/toggle", post(wishlist::toggle))
}

/// Create the compare routes router.
pub fn compare_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(compare::show).post(compare::add).delete(compare::clear),
        )
        .route("/items/{product_id}", delete(compare::remove))
        .route("/toggle", post(compare::toggle))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notifications::index)
                .post(notifications::create)
                .delete(notifications::clear),
        )
        .route("/{id}", delete(notifications::dismiss))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/cart", cart_routes())
        .route("/api/checkout/summary", get(checkout::summary))
        .nest("/api/wishlist", wishlist_routes())
        .nest("/api/compare", compare_routes())
        .nest("/api/notifications", notification_routes())
}
