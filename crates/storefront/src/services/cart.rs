//! Cart service: read-modify-write mutations and the reconciled view.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use quickbite_core::ProductId;

use crate::cache::{CacheError, CartCache};
use crate::catalog::{Catalog, CatalogError};
use crate::models::cart::{self, Cart, CartLine};

/// Cart operations over the cache and catalog boundaries.
///
/// Mutations touch only the cache and refresh the cart's expiry window.
/// Prices enter the picture exclusively when a view or checkout reconciles
/// against the catalog; the blob itself never holds one.
#[derive(Clone)]
pub struct CartService {
    cache: Arc<dyn CartCache>,
    catalog: Arc<dyn Catalog>,
    ttl: Duration,
}

impl CartService {
    #[must_use]
    pub fn new(cache: Arc<dyn CartCache>, catalog: Arc<dyn Catalog>, ttl: Duration) -> Self {
        Self {
            cache,
            catalog,
            ttl,
        }
    }

    /// Decode the cached cart for `key`.
    ///
    /// Absent and corrupt blobs both read as an empty cart. Corruption is
    /// logged; the bad blob stays in place until the next write replaces it
    /// or it expires.
    pub async fn read(&self, key: &str) -> Cart {
        let Some(blob) = self.cache.get(key).await else {
            return Cart::default();
        };
        match Cart::decode(&blob) {
            Ok(decoded) => decoded,
            Err(error) => {
                warn!(%error, "cart blob failed to decode, treating as empty cart");
                Cart::default()
            }
        }
    }

    /// Reconcile the cart for `key` against the current catalog.
    ///
    /// The read path never writes: entries that no longer resolve are pruned
    /// from the returned lines but stay in the blob.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the catalog cannot be reached; the cart
    /// blob is left untouched either way.
    #[instrument(skip(self))]
    pub async fn reconciled(&self, key: &str) -> Result<Vec<CartLine>, CatalogError> {
        let cart = self.read(key).await;
        if cart.is_empty() {
            return Ok(Vec::new());
        }

        let products = self.catalog.products_by_ids(&cart.product_ids()).await?;
        let lines = cart::reconcile(&cart, &products);
        let dropped = cart.entries().len().saturating_sub(lines.len());
        if dropped > 0 {
            debug!(dropped, "dropped cart entries no longer in the catalog");
        }
        Ok(lines)
    }

    /// Add a product to the cart, merging with any existing entry.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` when the write-back fails.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        key: &str,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CacheError> {
        let mut cart = self.read(key).await;
        cart.add(product_id, quantity);
        self.write(key, &cart).await
    }

    /// Remove a product from the cart.
    ///
    /// Returns whether an entry was actually dropped; removing an absent
    /// product succeeds all the same.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` when the write-back fails.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, key: &str, product_id: ProductId) -> Result<bool, CacheError> {
        let mut cart = self.read(key).await;
        let removed = cart.remove(product_id);
        self.write(key, &cart).await?;
        Ok(removed)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// Zero or a negative quantity removes the entry; an absent product is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` when the write-back fails.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        key: &str,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CacheError> {
        let mut cart = self.read(key).await;
        cart.set_quantity(product_id, quantity);
        self.write(key, &cart).await
    }

    /// Drop the cart outright. Used after a successful checkout.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` when the backing store refuses the removal.
    pub async fn clear(&self, key: &str) -> Result<(), CacheError> {
        self.cache.remove(key).await
    }

    async fn write(&self, key: &str, cart: &Cart) -> Result<(), CacheError> {
        let blob = cart
            .encode()
            .map_err(|e| CacheError::Backend(format!("cart blob serialization failed: {e}")))?;
        self.cache.set(key, blob, self.ttl).await
    }
}
