//! Session cart: raw cached entries and the reconciled view.
//!
//! The cart lives in the cart cache as an opaque JSON blob, an array of
//! `{id, quantity}` pairs. [`Cart`] is the decoded form plus the
//! mutations the HTTP surface exposes. [`reconcile`] joins a cart against
//! freshly fetched catalog products to produce priced [`CartLine`]s; it is
//! pure so the join semantics can be tested without I/O.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quickbite_core::ProductId;

use crate::models::product::Product;

/// One raw cart entry as stored in the cache blob.
///
/// The wire name for the product id is plain `id`, matching what existing
/// cached blobs carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The decoded session cart.
///
/// Invariants: product ids are unique across entries and every stored
/// quantity is >= 1. Both are enforced by [`Cart::decode`] and by the
/// mutation methods, so a blob written by one request never breaks the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Decode a cached blob, discarding anything that violates the cart
    /// invariants: entries with a non-positive quantity are dropped, and the
    /// first entry wins when a product id appears more than once.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the blob is not a JSON
    /// array of entries at all. Callers treat that as an empty cart.
    pub fn decode(blob: &str) -> Result<Self, serde_json::Error> {
        let raw: Vec<CartEntry> = serde_json::from_str(blob)?;
        let mut cart = Self::default();
        for entry in raw {
            if entry.quantity == 0 || cart.contains(entry.product_id) {
                continue;
            }
            cart.entries.push(entry);
        }
        Ok(cart)
    }

    /// Serialize the cart for the cache.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if serialization fails.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Product ids referenced by the cart, in cart order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.entries.iter().map(|e| e.product_id).collect()
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|e| e.product_id == product_id)
    }

    /// Add `quantity` of a product, merging with an existing entry.
    ///
    /// Adding zero of something is a no-op rather than an invalid entry.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(entry) = self.entry_mut(product_id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
        } else {
            self.entries.push(CartEntry {
                product_id,
                quantity,
            });
        }
    }

    /// Remove a product from the cart.
    ///
    /// Returns whether an entry was present. Removing an absent product is an
    /// allowed no-op so removal is idempotent from the client's view.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != product_id);
        self.entries.len() != before
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// A quantity of zero or less removes the entry. Editing a product that
    /// is not in the cart is a no-op, never a fault.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(entry) = self.entry_mut(product_id) {
            entry.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product_id == product_id)
    }
}

/// A cart entry joined with the authoritative catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub quantity: u32,
}

impl CartLine {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Join cart entries against fetched catalog products, in cart order.
///
/// Entries with no matching product are dropped: a product retired from the
/// menu disappears from the view without failing the request. Prices always
/// come from the fetched products, never from the cart.
#[must_use]
pub fn reconcile(cart: &Cart, products: &[Product]) -> Vec<CartLine> {
    let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();
    cart.entries()
        .iter()
        .filter_map(|entry| {
            by_id.get(&entry.product_id).map(|product| CartLine {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                description: product.description.clone(),
                quantity: entry.quantity,
            })
        })
        .collect()
}

/// Sum of line totals across a reconciled cart.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, name: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            description: format!("{name} description"),
        }
    }

    #[test]
    fn test_decode_wire_format() {
        let cart = Cart::decode(r#"[{"id":1,"quantity":2},{"id":2,"quantity":1}]"#).unwrap();
        assert_eq!(
            cart.entries(),
            &[
                CartEntry {
                    product_id: ProductId::new(1),
                    quantity: 2
                },
                CartEntry {
                    product_id: ProductId::new(2),
                    quantity: 1
                },
            ]
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Cart::decode("not json").is_err());
        assert!(Cart::decode(r#"{"id":1}"#).is_err());
    }

    #[test]
    fn test_decode_drops_zero_quantity_and_duplicates() {
        let cart = Cart::decode(
            r#"[{"id":1,"quantity":0},{"id":2,"quantity":3},{"id":2,"quantity":9}]"#,
        )
        .unwrap();
        assert_eq!(
            cart.entries(),
            &[CartEntry {
                product_id: ProductId::new(2),
                quantity: 3
            }]
        );
    }

    #[test]
    fn test_add_merges_existing_entry() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(1), 3);
        assert_eq!(
            cart.entries(),
            &[CartEntry {
                product_id: ProductId::new(1),
                quantity: 5
            }]
        );
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), 1);
        assert!(cart.remove(ProductId::new(1)));
        assert!(!cart.remove(ProductId::new(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_updates_existing() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), 1);
        cart.set_quantity(ProductId::new(1), 4);
        assert_eq!(
            cart.entries(),
            &[CartEntry {
                product_id: ProductId::new(1),
                quantity: 4
            }]
        );
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), 2);
        cart.set_quantity(ProductId::new(1), 0);
        assert!(cart.is_empty());

        cart.add(ProductId::new(2), 2);
        cart.set_quantity(ProductId::new(2), -5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_for_absent_product_is_noop() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), 2);
        cart.set_quantity(ProductId::new(99), 7);
        assert_eq!(
            cart.entries(),
            &[CartEntry {
                product_id: ProductId::new(1),
                quantity: 2
            }]
        );
    }

    #[test]
    fn test_reconcile_prices_from_catalog_in_cart_order() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(2), 1);
        cart.add(ProductId::new(1), 2);

        // Catalog returns products in its own order; the view keeps cart order.
        let products = vec![product(1, "Margherita", 500), product(2, "Garlic Bread", 300)];
        let lines = reconcile(&cart, &products);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines.first().unwrap().product_id, ProductId::new(2));
        assert_eq!(lines.first().unwrap().price, Decimal::new(300, 2));
        assert_eq!(lines.last().unwrap().product_id, ProductId::new(1));
        assert_eq!(lines.last().unwrap().quantity, 2);
    }

    #[test]
    fn test_reconcile_drops_unresolved_entries() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(42), 1);

        let products = vec![product(1, "Margherita", 500)];
        let lines = reconcile(&cart, &products);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().product_id, ProductId::new(1));
        // The raw cart still holds the stale entry; only the view prunes it.
        assert!(cart.contains(ProductId::new(42)));
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(2), 1);

        let products = vec![product(1, "Margherita", 500), product(2, "Garlic Bread", 300)];
        let lines = reconcile(&cart, &products);

        assert_eq!(subtotal(&lines), Decimal::new(1300, 2));
    }
}
