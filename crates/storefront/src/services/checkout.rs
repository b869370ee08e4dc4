//! Checkout: converts the session cart into a persisted order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument, warn};

use quickbite_core::{OrderId, OrderStatus, UserId};

use crate::catalog::CatalogError;
use crate::models::order::{NewOrder, OrderLine};
use crate::orders::{OrderStore, OrderStoreError};
use crate::services::cart::CartService;

/// Why a checkout attempt did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart is empty, expired, or nothing in it survived reconciliation.
    #[error("cart is empty")]
    EmptyCart,
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("order store error: {0}")]
    Store(#[from] OrderStoreError),
}

/// The checkout orchestration.
///
/// Two independent side effects happen here, in a fixed order: the order
/// write (the only durable one, after all reads complete) and then the cart
/// clear. There is no transaction across them; a failed clear leaves a stale
/// cart that expires on its own.
#[derive(Clone)]
pub struct CheckoutService {
    carts: CartService,
    orders: Arc<dyn OrderStore>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(carts: CartService, orders: Arc<dyn OrderStore>) -> Self {
        Self { carts, orders }
    }

    /// Place an order from the cart under `cart_key`.
    ///
    /// Every line is snapshotted at the current catalog price, never from
    /// anything the client echoed. The order is persisted as `Accepted` with
    /// `created_on = now`, then the cart is cleared.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::EmptyCart`] when nothing reconciles,
    /// [`CheckoutError::Catalog`] when the catalog is unreachable (the cart
    /// is left untouched so the customer can retry), and
    /// [`CheckoutError::Store`] when persisting fails.
    #[instrument(skip(self), fields(%user_id))]
    pub async fn place_order(
        &self,
        cart_key: &str,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<OrderId, CheckoutError> {
        let lines = self.carts.reconciled(cart_key).await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = NewOrder {
            user_id,
            created_on: now,
            status: OrderStatus::Accepted,
            lines: lines.into_iter().map(OrderLine::from).collect(),
        };
        let order_id = self.orders.add_order(order).await?;
        info!(%order_id, "order accepted");

        if let Err(error) = self.carts.clear(cart_key).await {
            warn!(
                %order_id,
                %error,
                "order persisted but cart clear failed, cart will expire on its own"
            );
        }

        Ok(order_id)
    }
}
