//! Cart and checkout route handlers.
//!
//! The cart lives in the cart cache keyed by a session-scoped UUID. Every
//! read reconciles the stored entries against the catalog, so names and
//! prices are always the catalog's current ones and delisted products drop
//! out of the view on their own.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use quickbite_core::ProductId;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireUser;
use crate::models::cart::{self, CartLine};
use crate::models::session::keys;
use crate::services::CheckoutError;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: Decimal,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            subtotal: Decimal::ZERO,
            item_count: 0,
        }
    }
}

impl From<Vec<CartLine>> for CartView {
    fn from(lines: Vec<CartLine>) -> Self {
        let subtotal = cart::subtotal(&lines);
        let item_count = lines
            .iter()
            .map(|line| line.quantity)
            .fold(0u32, u32::saturating_add);

        Self {
            lines: lines.into_iter().map(CartLineView::from).collect(),
            subtotal,
            item_count,
        }
    }
}

impl From<CartLine> for CartLineView {
    fn from(line: CartLine) -> Self {
        let line_total = line.line_total();
        Self {
            product_id: line.product_id,
            name: line.name,
            price: line.price,
            description: line.description,
            quantity: line.quantity,
            line_total,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart key from the session, if one has been issued.
async fn cart_key(session: &Session) -> Option<String> {
    session.get::<String>(keys::CART_KEY).await.ok().flatten()
}

/// Get the session's cart key, issuing a fresh one on first use.
async fn ensure_cart_key(session: &Session) -> Result<String> {
    if let Some(key) = cart_key(session).await {
        return Ok(key);
    }

    let key = Uuid::new_v4().to_string();
    session.insert(keys::CART_KEY, key.clone()).await?;
    Ok(key)
}

/// Add to cart payload.
#[derive(Debug, Deserialize)]
pub struct AddItemPayload {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Quantity update payload.
#[derive(Debug, Deserialize)]
pub struct SetQuantityPayload {
    pub product_id: ProductId,
    pub quantity: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
///
/// Entries whose product has left the menu are dropped from the view; the
/// stored cart itself stays as-is until the next mutation or expiry.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let Some(key) = cart_key(&session).await else {
        return Ok(Json(CartView::empty()));
    };

    let lines = state.carts().reconciled(&key).await?;
    Ok(Json(CartView::from(lines)))
}

/// Add a product to the cart.
///
/// Adding a product already in the cart merges quantities. Defaults to a
/// quantity of one when the payload leaves it out.
#[instrument(skip(state, session))]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AddItemPayload>,
) -> Result<StatusCode> {
    let quantity = payload.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let key = ensure_cart_key(&session).await?;
    state
        .carts()
        .add_item(&key, payload.product_id, quantity)
        .await?;

    let product_id = payload.product_id.to_string();
    let quantity = quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", &product_id), ("quantity", &quantity)]),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Set the quantity of a cart line.
///
/// A quantity of zero or less removes the line. A product that is not in the
/// cart is left alone.
#[instrument(skip(state, session))]
pub async fn set_quantity(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SetQuantityPayload>,
) -> Result<StatusCode> {
    let Some(key) = cart_key(&session).await else {
        // No cart yet, nothing to update
        return Ok(StatusCode::NO_CONTENT);
    };

    state
        .carts()
        .set_quantity(&key, payload.product_id, payload.quantity)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a product from the cart.
///
/// The body is a success indicator, so removing something already gone still
/// reports `true`; failures surface as error statuses instead.
#[instrument(skip(state, session))]
pub async fn remove_item(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<i32>,
) -> Result<Json<bool>> {
    let product_id = ProductId::new(product_id);

    let Some(key) = cart_key(&session).await else {
        return Ok(Json(true));
    };

    let removed = state.carts().remove_item(&key, product_id).await?;
    if !removed {
        tracing::debug!(%product_id, "remove requested for product not in cart");
    }

    Ok(Json(true))
}

/// Place an order from the current cart.
///
/// Snapshots the reconciled cart into an order owned by the signed-in user,
/// then redirects to the order's tracking page. An empty or never-created
/// cart is rejected rather than turned into an empty order.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Redirect> {
    let Some(key) = cart_key(&session).await else {
        return Err(AppError::Checkout(CheckoutError::EmptyCart));
    };

    let order_id = state.checkout().place_order(&key, user.id, Utc::now()).await?;

    let order = order_id.to_string();
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", &order)]));

    Ok(Redirect::to(&format!("/orders/{order_id}")))
}
