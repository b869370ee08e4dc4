//! Postgres-backed order store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use quickbite_core::{OrderId, OrderStatus, ProductId, UserId};

use crate::models::order::{NewOrder, Order, OrderLine};

use super::{OrderStore, OrderStoreError};

/// Orders and their lines in the storefront schema.
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    created_on: DateTime<Utc>,
    status: OrderStatus,
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    order_id: OrderId,
    product_id: ProductId,
    name: String,
    price: Decimal,
    description: String,
    quantity: i32,
}

impl OrderLineRow {
    fn into_line(self) -> Result<OrderLine, OrderStoreError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            OrderStoreError::DataCorruption(format!(
                "order line quantity {} out of range",
                self.quantity
            ))
        })?;
        Ok(OrderLine {
            product_id: self.product_id,
            name: self.name,
            price: self.price,
            description: self.description,
            quantity,
        })
    }
}

fn assemble(row: OrderRow, line_rows: Vec<OrderLineRow>) -> Result<Order, OrderStoreError> {
    let lines = line_rows
        .into_iter()
        .map(OrderLineRow::into_line)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Order {
        id: row.id,
        user_id: row.user_id,
        created_on: row.created_on,
        status: row.status,
        lines,
    })
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn add_order(&self, order: NewOrder) -> Result<OrderId, OrderStoreError> {
        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query_scalar::<_, OrderId>(
            "INSERT INTO storefront.orders (user_id, created_on, status)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(order.user_id)
        .bind(order.created_on)
        .bind(order.status)
        .fetch_one(&mut *tx)
        .await?;

        for line in &order.lines {
            sqlx::query(
                "INSERT INTO storefront.order_line
                     (order_id, product_id, name, price, description, quantity)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(line.price)
            .bind(&line.description)
            .bind(i32::try_from(line.quantity).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }

        // An uncommitted transaction rolls back on drop, so a request aborted
        // mid-flight leaves no half-written order.
        tx.commit().await?;
        Ok(order_id)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderStoreError> {
        let Some(row) = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, created_on, status
             FROM storefront.orders
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let line_rows = sqlx::query_as::<_, OrderLineRow>(
            "SELECT order_id, product_id, name, price, description, quantity
             FROM storefront.order_line
             WHERE order_id = $1
             ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        assemble(row, line_rows).map(Some)
    }

    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderStoreError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, created_on, status
             FROM storefront.orders
             WHERE user_id = $1
             ORDER BY created_on DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = rows.iter().map(|r| r.id.as_i32()).collect();
        let line_rows = sqlx::query_as::<_, OrderLineRow>(
            "SELECT order_id, product_id, name, price, description, quantity
             FROM storefront.order_line
             WHERE order_id = ANY($1)
             ORDER BY id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut lines_by_order: HashMap<OrderId, Vec<OrderLine>> = HashMap::new();
        for line_row in line_rows {
            let order_id = line_row.order_id;
            lines_by_order
                .entry(order_id)
                .or_default()
                .push(line_row.into_line()?);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let lines = lines_by_order.remove(&row.id).unwrap_or_default();
                Order {
                    id: row.id,
                    user_id: row.user_id,
                    created_on: row.created_on,
                    status: row.status,
                    lines,
                }
            })
            .collect())
    }

    async fn update_status(
        &self,
        id: OrderId,
        new_status: OrderStatus,
    ) -> Result<(), OrderStoreError> {
        let mut tx = self.pool.begin().await?;

        // The row lock makes check-then-update a single-writer section.
        let current = sqlx::query_scalar::<_, OrderStatus>(
            "SELECT status FROM storefront.orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderStoreError::NotFound)?;

        if !current.can_transition_to(new_status) {
            return Err(OrderStoreError::InvalidTransition {
                from: current,
                to: new_status,
            });
        }

        sqlx::query("UPDATE storefront.orders SET status = $1 WHERE id = $2")
            .bind(new_status)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
