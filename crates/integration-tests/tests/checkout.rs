//! Integration tests for checkout.
//!
//! Each test assembles the real cart and checkout services over the
//! in-memory doubles and walks a session cart through to a persisted order,
//! including the partial-failure paths.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use quickbite_core::{OrderStatus, ProductId, UserId};
use quickbite_integration_tests::{FlakyCartCache, MemoryOrderStore, StubCatalog, product};
use quickbite_storefront::cache::CartCache;
use quickbite_storefront::orders::OrderStore;
use quickbite_storefront::services::{CartService, CheckoutError, CheckoutService};

const CART_TTL: Duration = Duration::from_secs(30 * 60);
const USER: UserId = UserId::new(7);

/// The full stack under test, with handles onto every double.
struct Harness {
    carts: CartService,
    checkout: CheckoutService,
    catalog: Arc<StubCatalog>,
    orders: Arc<MemoryOrderStore>,
    cache: Arc<FlakyCartCache>,
}

impl Harness {
    fn new() -> Self {
        let cache = Arc::new(FlakyCartCache::new());
        let catalog = Arc::new(StubCatalog::new(vec![
            product(1, "Smash Burger", 500),
            product(2, "Crinkle Fries", 300),
        ]));
        let orders = Arc::new(MemoryOrderStore::new());
        let carts = CartService::new(cache.clone(), catalog.clone(), CART_TTL);
        let checkout = CheckoutService::new(carts.clone(), orders.clone());
        Self {
            carts,
            checkout,
            catalog,
            orders,
            cache,
        }
    }

    /// Seed a cart with 2x burger + 1x fries and return its key.
    async fn seeded_cart(&self) -> String {
        let key = Uuid::new_v4().to_string();
        self.carts
            .add_item(&key, ProductId::new(1), 2)
            .await
            .expect("add should succeed");
        self.carts
            .add_item(&key, ProductId::new(2), 1)
            .await
            .expect("add should succeed");
        key
    }
}

// =============================================================================
// Happy Path Tests
// =============================================================================

#[tokio::test]
async fn test_checkout_snapshots_cart_at_catalog_prices() {
    let h = Harness::new();
    let key = h.seeded_cart().await;
    let now = Utc::now();

    let order_id = h
        .checkout
        .place_order(&key, USER, now)
        .await
        .expect("checkout should succeed");

    let order = h
        .orders
        .get_order(order_id)
        .await
        .expect("lookup should succeed")
        .expect("order should exist");

    assert_eq!(order.user_id, USER);
    assert_eq!(order.status, OrderStatus::Accepted);
    assert_eq!(order.created_on, now);
    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.total(), Decimal::new(1300, 2));

    let burger = order.lines.first().expect("burger line should exist");
    assert_eq!(burger.product_id, ProductId::new(1));
    assert_eq!(burger.quantity, 2);
    assert_eq!(burger.price, Decimal::new(500, 2));
}

#[tokio::test]
async fn test_checkout_clears_the_cart() {
    let h = Harness::new();
    let key = h.seeded_cart().await;

    h.checkout
        .place_order(&key, USER, Utc::now())
        .await
        .expect("checkout should succeed");

    assert_eq!(h.cache.get(&key).await, None);
    let lines = h
        .carts
        .reconciled(&key)
        .await
        .expect("reconcile should succeed");
    assert!(lines.is_empty());
}

#[tokio::test]
async fn test_checkout_charges_current_catalog_prices() {
    let h = Harness::new();
    let key = h.seeded_cart().await;

    // The menu is repriced between the cart write and checkout; the order
    // must charge the price at checkout time, not at add time.
    h.catalog.set_price(ProductId::new(1), Decimal::new(600, 2));

    let order_id = h
        .checkout
        .place_order(&key, USER, Utc::now())
        .await
        .expect("checkout should succeed");
    let order = h
        .orders
        .get_order(order_id)
        .await
        .expect("lookup should succeed")
        .expect("order should exist");

    let burger = order.lines.first().expect("burger line should exist");
    assert_eq!(burger.price, Decimal::new(600, 2));
    assert_eq!(order.total(), Decimal::new(1500, 2));
}

#[tokio::test]
async fn test_placed_order_is_immune_to_later_catalog_changes() {
    let h = Harness::new();
    let key = h.seeded_cart().await;

    let order_id = h
        .checkout
        .place_order(&key, USER, Utc::now())
        .await
        .expect("checkout should succeed");

    // Reprice and delist after the fact; the stored snapshot must not move.
    h.catalog.set_price(ProductId::new(2), Decimal::new(999, 2));
    h.catalog.delist(ProductId::new(1));

    let order = h
        .orders
        .get_order(order_id)
        .await
        .expect("lookup should succeed")
        .expect("order should exist");
    assert_eq!(order.total(), Decimal::new(1300, 2));
    let fries = order.lines.last().expect("fries line should exist");
    assert_eq!(fries.price, Decimal::new(300, 2));
}

// =============================================================================
// Rejection Tests
// =============================================================================

#[tokio::test]
async fn test_checkout_empty_cart_is_rejected() {
    let h = Harness::new();

    let err = h
        .checkout
        .place_order(&Uuid::new_v4().to_string(), USER, Utc::now())
        .await
        .expect_err("an empty cart should not check out");
    assert!(matches!(err, CheckoutError::EmptyCart));
    assert!(
        h.orders
            .orders_for_user(USER)
            .await
            .expect("lookup should succeed")
            .is_empty()
    );
}

#[tokio::test]
async fn test_second_checkout_of_the_same_cart_is_rejected() {
    let h = Harness::new();
    let key = h.seeded_cart().await;

    h.checkout
        .place_order(&key, USER, Utc::now())
        .await
        .expect("first checkout should succeed");

    // The cart was cleared, so replaying the redirect cannot double-order.
    let err = h
        .checkout
        .place_order(&key, USER, Utc::now())
        .await
        .expect_err("second checkout should find nothing to order");
    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(
        h.orders
            .orders_for_user(USER)
            .await
            .expect("lookup should succeed")
            .len(),
        1
    );
}

// =============================================================================
// Failure Mode Tests
// =============================================================================

#[tokio::test]
async fn test_catalog_outage_aborts_checkout_and_preserves_cart() {
    let h = Harness::new();
    let key = h.seeded_cart().await;

    h.catalog.set_failing(true);
    let err = h
        .checkout
        .place_order(&key, USER, Utc::now())
        .await
        .expect_err("checkout should fail while the catalog is down");
    assert!(matches!(err, CheckoutError::Catalog(_)));

    // Nothing was persisted and the cart survives for a retry.
    assert!(
        h.orders
            .orders_for_user(USER)
            .await
            .expect("lookup should succeed")
            .is_empty()
    );
    assert!(h.cache.get(&key).await.is_some());

    h.catalog.set_failing(false);
    h.checkout
        .place_order(&key, USER, Utc::now())
        .await
        .expect("retry should succeed once the catalog recovers");
}

#[tokio::test]
async fn test_store_failure_aborts_checkout_and_preserves_cart() {
    let h = Harness::new();
    let key = h.seeded_cart().await;

    h.orders.set_failing(true);
    let err = h
        .checkout
        .place_order(&key, USER, Utc::now())
        .await
        .expect_err("checkout should fail while the store is down");
    assert!(matches!(err, CheckoutError::Store(_)));
    assert!(h.cache.get(&key).await.is_some());

    h.orders.set_failing(false);
    let order_id = h
        .checkout
        .place_order(&key, USER, Utc::now())
        .await
        .expect("retry should succeed once the store recovers");
    let order = h
        .orders
        .get_order(order_id)
        .await
        .expect("lookup should succeed")
        .expect("order should exist");
    assert_eq!(order.total(), Decimal::new(1300, 2));
}

#[tokio::test]
async fn test_failed_cart_clear_does_not_fail_the_order() {
    let h = Harness::new();
    let key = h.seeded_cart().await;

    h.cache.fail_removes(true);
    let order_id = h
        .checkout
        .place_order(&key, USER, Utc::now())
        .await
        .expect("checkout should succeed even when the clear fails");

    // The order is durable; the stale cart merely lingers until it expires.
    assert!(
        h.orders
            .get_order(order_id)
            .await
            .expect("lookup should succeed")
            .is_some()
    );
    assert!(h.cache.get(&key).await.is_some());
}

// =============================================================================
// Order History Tests
// =============================================================================

#[tokio::test]
async fn test_orders_for_user_returns_newest_first() {
    let h = Harness::new();

    let first_key = h.seeded_cart().await;
    let early = Utc::now() - chrono::Duration::minutes(10);
    let first_id = h
        .checkout
        .place_order(&first_key, USER, early)
        .await
        .expect("checkout should succeed");

    let second_key = h.seeded_cart().await;
    let second_id = h
        .checkout
        .place_order(&second_key, USER, Utc::now())
        .await
        .expect("checkout should succeed");

    let orders = h
        .orders
        .orders_for_user(USER)
        .await
        .expect("lookup should succeed");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders.first().expect("newest order").id, second_id);
    assert_eq!(orders.last().expect("oldest order").id, first_id);

    // Another user sees nothing.
    assert!(
        h.orders
            .orders_for_user(UserId::new(8))
            .await
            .expect("lookup should succeed")
            .is_empty()
    );
}
