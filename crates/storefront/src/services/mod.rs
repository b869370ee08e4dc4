//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Cart reads, mutations, and reconciliation against the catalog
//! - `checkout` - Converts the session cart into a persisted order

pub mod cart;
pub mod checkout;

pub use cart::CartService;
pub use checkout::{CheckoutError, CheckoutService};
