//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `quickbite`
//!
//! ## Tables
//!
//! - `storefront.product` - The menu (authoritative names and prices)
//! - `storefront.orders` - Placed orders with their status
//! - `storefront.order_line` - Immutable price snapshots per order
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! Carts are deliberately absent: they live in the cart cache until checkout.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run on
//! startup via `sqlx::migrate!`. The session table is created by
//! tower-sessions' own migration, also at startup.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
