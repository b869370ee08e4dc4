//! Postgres-backed catalog.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use quickbite_core::ProductId;

use crate::models::product::Product;

use super::{Catalog, CatalogError};

/// Upper bound on a single catalog query. Checkout would rather fail, with
/// the cart intact, than wait on a stuck backend.
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Catalog reads against the storefront database.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_timeout<T>(
        fut: impl Future<Output = Result<T, sqlx::Error>> + Send,
    ) -> Result<T, CatalogError> {
        match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
            Ok(result) => result.map_err(CatalogError::Database),
            Err(_elapsed) => Err(CatalogError::Timeout),
        }
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let query = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, description
             FROM storefront.product
             WHERE id = ANY($1)",
        )
        .bind(raw_ids)
        .fetch_all(&self.pool);
        Self::with_timeout(query).await
    }

    async fn menu(&self) -> Result<Vec<Product>, CatalogError> {
        let query = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, description
             FROM storefront.product
             ORDER BY name",
        )
        .fetch_all(&self.pool);
        Self::with_timeout(query).await
    }
}
