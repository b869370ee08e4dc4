//! Durable order snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use quickbite_core::{OrderId, OrderStatus, ProductId, UserId};

use crate::models::cart::CartLine;

/// One line of a placed order: the cart line as priced at checkout.
///
/// Catalog changes after checkout never alter these rows; they are the
/// point-in-time record of what the customer agreed to pay.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub quantity: u32,
}

impl OrderLine {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<CartLine> for OrderLine {
    fn from(line: CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name,
            price: line.price,
            description: line.description,
            quantity: line.quantity,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub created_on: DateTime<Utc>,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Total across all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(OrderLine::line_total).sum()
    }
}

/// An order as assembled at checkout, before the store assigns its id.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub created_on: DateTime<Utc>,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total() {
        let order = Order {
            id: OrderId::new(1),
            user_id: UserId::new(7),
            created_on: Utc::now(),
            status: OrderStatus::Accepted,
            lines: vec![
                OrderLine {
                    product_id: ProductId::new(1),
                    name: "Margherita".to_string(),
                    price: Decimal::new(500, 2),
                    description: String::new(),
                    quantity: 2,
                },
                OrderLine {
                    product_id: ProductId::new(2),
                    name: "Garlic Bread".to_string(),
                    price: Decimal::new(300, 2),
                    description: String::new(),
                    quantity: 1,
                },
            ],
        };

        assert_eq!(order.total(), Decimal::new(1300, 2));
    }
}
