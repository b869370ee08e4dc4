//! Order route handlers.
//!
//! Orders are immutable snapshots once placed; these views simply render
//! what the store recorded. Both routes require the signed-in owner.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use quickbite_core::{OrderId, OrderStatus, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::order::{Order, OrderLine};
use crate::state::AppState;

/// Order line display data.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineView {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Full order display data.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub created_on: DateTime<Utc>,
    pub status: OrderStatus,
    pub lines: Vec<OrderLineView>,
    pub total: Decimal,
}

/// Order summary for history listings.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummaryView {
    pub id: OrderId,
    pub created_on: DateTime<Utc>,
    pub status: OrderStatus,
    pub total: Decimal,
}

impl From<OrderLine> for OrderLineView {
    fn from(line: OrderLine) -> Self {
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

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        let total = order.total();
        Self {
            id: order.id,
            created_on: order.created_on,
            status: order.status,
            lines: order.lines.into_iter().map(OrderLineView::from).collect(),
            total,
        }
    }
}

impl From<&Order> for OrderSummaryView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            created_on: order.created_on,
            status: order.status,
            total: order.total(),
        }
    }
}

/// List the current user's orders, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<OrderSummaryView>>> {
    let orders = state.orders().orders_for_user(user.id).await?;
    Ok(Json(orders.iter().map(OrderSummaryView::from).collect()))
}

/// Display a single order.
///
/// Only the owner can see an order; anyone else gets a 404 rather than
/// confirmation that the ID exists.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i32>,
) -> Result<Json<OrderView>> {
    let id = OrderId::new(id);

    // Someone else's order looks identical to a missing one
    let order = state
        .orders()
        .get_order(id)
        .await?
        .filter(|order| order.user_id == user.id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(Json(OrderView::from(order)))
}
