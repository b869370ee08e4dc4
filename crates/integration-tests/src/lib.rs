//! Integration tests for Quickbite.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quickbite-integration-tests
//! ```
//!
//! No database or network is required: the suites drive the real cart and
//! checkout services against the in-memory doubles defined here.
//!
//! # Test Categories
//!
//! - `cart_pipeline` - Cart reads, mutations, and catalog reconciliation
//! - `checkout` - Cart-to-order conversion and its failure modes
//! - `order_status` - Order lifecycle transitions through the store

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use quickbite_core::{OrderId, OrderStatus, ProductId, UserId};
use quickbite_storefront::cache::{CacheError, CartCache, MemoryCartCache};
use quickbite_storefront::catalog::{Catalog, CatalogError};
use quickbite_storefront::models::order::{NewOrder, Order};
use quickbite_storefront::models::product::Product;
use quickbite_storefront::orders::{OrderStore, OrderStoreError};

// =============================================================================
// Fixtures
// =============================================================================

/// Build a catalog product for tests. Prices are given in cents.
#[must_use]
pub fn product(id: i32, name: &str, price_cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Decimal::new(price_cents, 2),
        description: format!("{name} description"),
    }
}

// =============================================================================
// Catalog double
// =============================================================================

/// In-memory [`Catalog`] with a failure switch.
///
/// Prices can be edited mid-test to model the menu changing between a cart
/// write and checkout.
pub struct StubCatalog {
    products: Mutex<Vec<Product>>,
    failing: AtomicBool,
}

impl StubCatalog {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every lookup fail with [`CatalogError::Timeout`] until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Reprice a product in place.
    pub fn set_price(&self, id: ProductId, price: Decimal) {
        let mut products = self.lock();
        if let Some(p) = products.iter_mut().find(|p| p.id == id) {
            p.price = price;
        }
    }

    /// Drop a product from the catalog, as if it were taken off the menu.
    pub fn delist(&self, id: ProductId) {
        self.lock().retain(|p| p.id != id);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Product>> {
        self.products.lock().expect("catalog mutex poisoned")
    }
}

#[async_trait]
impl Catalog for StubCatalog {
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, CatalogError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Timeout);
        }
        let products = self.lock();
        Ok(products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn menu(&self) -> Result<Vec<Product>, CatalogError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Timeout);
        }
        let mut products = self.lock().clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }
}

// =============================================================================
// Order store double
// =============================================================================

/// In-memory [`OrderStore`] mirroring the Postgres store's semantics.
///
/// Ids are assigned sequentially from 1. Status changes go through
/// [`OrderStatus::can_transition_to`], the same guard the real store uses.
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<Vec<Order>>,
    failing: AtomicBool,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Order>> {
        self.orders.lock().expect("order store mutex poisoned")
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn add_order(&self, order: NewOrder) -> Result<OrderId, OrderStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(OrderStoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut orders = self.lock();
        let id = OrderId::new(i32::try_from(orders.len().saturating_add(1)).unwrap_or(i32::MAX));
        orders.push(Order {
            id,
            user_id: order.user_id,
            created_on: order.created_on,
            status: order.status,
            lines: order.lines,
        });
        Ok(id)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderStoreError> {
        Ok(self.lock().iter().find(|o| o.id == id).cloned())
    }

    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderStoreError> {
        let mut orders: Vec<Order> = self
            .lock()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        // Same newest-first ordering the SQL uses, id as the tiebreak.
        orders.sort_by(|a, b| {
            b.created_on
                .cmp(&a.created_on)
                .then(b.id.as_i32().cmp(&a.id.as_i32()))
        });
        Ok(orders)
    }

    async fn update_status(
        &self,
        id: OrderId,
        new_status: OrderStatus,
    ) -> Result<(), OrderStoreError> {
        let mut orders = self.lock();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(OrderStoreError::NotFound)?;
        if !order.status.can_transition_to(new_status) {
            return Err(OrderStoreError::InvalidTransition {
                from: order.status,
                to: new_status,
            });
        }
        order.status = new_status;
        Ok(())
    }
}

// =============================================================================
// Cart cache double
// =============================================================================

/// [`CartCache`] wrapper whose writes can be made to fail.
///
/// Reads always pass through, so a test can break removals and then inspect
/// what the failed clear left behind.
#[derive(Default)]
pub struct FlakyCartCache {
    inner: MemoryCartCache,
    writes_failing: AtomicBool,
    removes_failing: AtomicBool,
}

impl FlakyCartCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make [`CartCache::set`] fail until reset.
    pub fn fail_writes(&self, failing: bool) {
        self.writes_failing.store(failing, Ordering::SeqCst);
    }

    /// Make [`CartCache::remove`] fail until reset.
    pub fn fail_removes(&self, failing: bool) {
        self.removes_failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CartCache for FlakyCartCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, blob: String, ttl: Duration) -> Result<(), CacheError> {
        if self.writes_failing.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("cart store unavailable".to_string()));
        }
        self.inner.set(key, blob, ttl).await
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        if self.removes_failing.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("cart store unavailable".to_string()));
        }
        self.inner.remove(key).await
    }
}
