//! Catalog lookup boundary.
//!
//! The catalog is the read-only source of product truth: names, descriptions
//! and above all prices. Everything the cart pipeline shows or charges is
//! re-resolved through this boundary at read time; client-echoed prices never
//! enter the system.

use async_trait::async_trait;
use thiserror::Error;

use quickbite_core::ProductId;

use crate::models::product::Product;

mod pg;

pub use pg::PgCatalog;

/// Failure talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog query failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("catalog lookup timed out")]
    Timeout,
}

/// Read-only product catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Batch-resolve product ids to catalog records in a single round trip.
    ///
    /// Ids with no catalog record are simply missing from the result; the
    /// caller decides what a gap means.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, CatalogError>;

    /// The full menu.
    async fn menu(&self) -> Result<Vec<Product>, CatalogError>;
}
