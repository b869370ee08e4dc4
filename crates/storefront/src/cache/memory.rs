//! In-process cart cache backed by `moka`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use super::{CacheError, CartCache};

/// Value stored per cart: the blob plus the TTL it was written with, so each
/// entry carries its own expiry window.
#[derive(Debug, Clone)]
struct CachedCart {
    blob: String,
    ttl: Duration,
}

/// Expiry policy: every write, create or overwrite, restarts the entry's own
/// TTL clock. Reads do not extend it.
struct PerEntryTtl;

impl Expiry<String, CachedCart> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedCart,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedCart,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cart cache.
///
/// Cloning shares the underlying store, so one instance serves the whole
/// router. Capacity is bounded; moka evicts the least-recently-used carts
/// beyond it.
#[derive(Clone)]
pub struct MemoryCartCache {
    cache: Cache<String, CachedCart>,
}

impl MemoryCartCache {
    const MAX_CARTS: u64 = 100_000;

    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(Self::MAX_CARTS)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

impl Default for MemoryCartCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartCache for MemoryCartCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).await.map(|entry| entry.blob)
    }

    async fn set(&self, key: &str, blob: String, ttl: Duration) -> Result<(), CacheError> {
        self.cache
            .insert(key.to_owned(), CachedCart { blob, ttl })
            .await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}
