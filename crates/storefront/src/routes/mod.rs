//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Menu
//! GET    /menu                     - Product listing
//!
//! # Cart
//! GET    /cart                     - Cart view (reconciled against the catalog)
//! POST   /cart/items               - Add a product to the cart
//! POST   /cart/items/quantity      - Set the quantity of a cart line
//! DELETE /cart/items/{product_id}  - Remove a product (returns JSON boolean)
//!
//! # Checkout (requires auth)
//! POST   /checkout                 - Place the order, redirect to /orders/{id}
//!
//! # Orders (requires auth)
//! GET    /orders                   - Order history for the current user
//! GET    /orders/{id}              - Single order with line items
//! ```

pub mod cart;
pub mod menu;
pub mod orders;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new().route("/", get(menu::index))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add_item))
        .route("/items/quantity", post(cart::set_quantity))
        .route("/items/{product_id}", delete(cart::remove_item))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Menu routes
        .nest("/menu", menu_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(cart::checkout))
        // Order routes
        .nest("/orders", order_routes())
}
