//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::{CartCache, MemoryCartCache};
use crate::catalog::{Catalog, PgCatalog};
use crate::config::StorefrontConfig;
use crate::orders::{OrderStore, PgOrderStore};
use crate::services::{CartService, CheckoutService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: Arc<dyn Catalog>,
    orders: Arc<dyn OrderStore>,
    carts: CartService,
    checkout: CheckoutService,
}

impl AppState {
    /// Create application state backed by Postgres and the in-process cart cache.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let cache: Arc<dyn CartCache> = Arc::new(MemoryCartCache::new());
        Self::with_cart_cache(config, pool, cache)
    }

    /// Create application state with a caller-supplied cart cache backend.
    ///
    /// Lets deployments swap the in-process cache for a shared one without
    /// touching the services built on top of it.
    #[must_use]
    pub fn with_cart_cache(
        config: StorefrontConfig,
        pool: PgPool,
        cache: Arc<dyn CartCache>,
    ) -> Self {
        let catalog: Arc<dyn Catalog> = Arc::new(PgCatalog::new(pool.clone()));
        let orders: Arc<dyn OrderStore> = Arc::new(PgOrderStore::new(pool.clone()));
        let carts = CartService::new(cache, Arc::clone(&catalog), config.cart_ttl());
        let checkout = CheckoutService::new(carts.clone(), Arc::clone(&orders));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                orders,
                carts,
                checkout,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.inner.catalog
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn orders(&self) -> &Arc<dyn OrderStore> {
        &self.inner.orders
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn carts(&self) -> &CartService {
        &self.inner.carts
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}
