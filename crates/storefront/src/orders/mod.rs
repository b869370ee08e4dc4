//! Order store boundary.

use async_trait::async_trait;
use thiserror::Error;

use quickbite_core::{OrderId, OrderStatus, UserId};

use crate::models::order::{NewOrder, Order};

mod pg;

pub use pg::PgOrderStore;

/// Failure in the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("order not found")]
    NotFound,
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Durable, append-only order collection.
///
/// Orders enter through [`OrderStore::add_order`] and change only through
/// [`OrderStore::update_status`]; nothing is ever deleted, terminal orders
/// stay readable for history.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order atomically and return its assigned id.
    async fn add_order(&self, order: NewOrder) -> Result<OrderId, OrderStoreError>;

    /// Fetch one order with its lines.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// All orders for a user, newest first.
    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderStoreError>;

    /// Move an order to `new_status`.
    ///
    /// Single-writer: the current status is read under a lock, the
    /// transition is checked against [`OrderStatus::can_transition_to`], and
    /// terminal states reject everything.
    async fn update_status(
        &self,
        id: OrderId,
        new_status: OrderStatus,
    ) -> Result<(), OrderStoreError>;
}
