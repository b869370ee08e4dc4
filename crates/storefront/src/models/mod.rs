//! Domain models for storefront.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
