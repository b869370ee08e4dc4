//! Catalog product record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quickbite_core::ProductId;

/// A menu product as the catalog knows it.
///
/// The catalog is the sole authority for prices. Nothing client-supplied ever
/// flows into `price`; carts store only product ids and quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
}
