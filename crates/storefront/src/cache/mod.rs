//! Cart cache boundary.
//!
//! The session cart lives here as an opaque, expiring blob behind an
//! injectable capability: get/set/remove with a per-entry TTL. The backing
//! store is swappable (in-process today, a shared store later) without
//! touching the cart pipeline.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

mod memory;

pub use memory::MemoryCartCache;

/// Failure in the cache backing store.
///
/// The in-process implementation never fails; remote backings surface their
/// transport errors here.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Session-scoped cart storage.
///
/// Keys are opaque strings owned by a single session. Absence is not an
/// error: an expired or never-written cart reads as `None` and callers treat
/// it as an empty cart.
#[async_trait]
pub trait CartCache: Send + Sync {
    /// Fetch the raw blob for `key`, or `None` when missing or expired.
    async fn get(&self, key: &str) -> Option<String>;

    /// Overwrite the blob for `key` and reset its expiry to `ttl` from now.
    async fn set(&self, key: &str, blob: String, ttl: Duration) -> Result<(), CacheError>;

    /// Drop the entry for `key` immediately.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}
