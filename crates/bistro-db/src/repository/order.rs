//! # Order Repository
//!
//! Database operations for placed orders.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  checkout validated + priced                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert() ── one INSERT, order_number UNIQUE                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  row is immutable (no update or delete path)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bistro_core::{CartItem, DeliveryOption, Money, Order, ServiceType};

/// Row shape of the `orders` table.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_number: String,
    customer_name: String,
    customer_phone: String,
    items: String,
    subtotal_cents: i64,
    tax_cents: i64,
    delivery_fee_cents: i64,
    final_total_cents: i64,
    service_type: String,
    delivery_option: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> DbResult<Self> {
        let items: Vec<CartItem> = serde_json::from_str(&row.items)?;
        let service_type = ServiceType::parse("service_type", &row.service_type)
            .map_err(|e| DbError::invalid_data("service_type", e))?;
        let delivery_option = DeliveryOption::parse("delivery_option", &row.delivery_option)
            .map_err(|e| DbError::invalid_data("delivery_option", e))?;

        Ok(Order {
            order_number: row.order_number,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            items,
            subtotal: Money::from_cents(row.subtotal_cents),
            tax_amount: Money::from_cents(row.tax_cents),
            delivery_fee: Money::from_cents(row.delivery_fee_cents),
            final_total: Money::from_cents(row.final_total_cents),
            service_type,
            delivery_option,
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and returns its row id.
    ///
    /// ## Errors
    /// - [`DbError::UniqueViolation`] if the order number already exists
    /// - [`DbError::ConnectionFailed`] if the pool is closed
    pub async fn insert(&self, order: &Order) -> DbResult<i64> {
        debug!(order_number = %order.order_number, "Inserting order");

        let items = serde_json::to_string(&order.items)?;

        let result = sqlx::query(
            r#"
            INSERT INTO orders (
                order_number, customer_name, customer_phone, items,
                subtotal_cents, tax_cents, delivery_fee_cents, final_total_cents,
                service_type, delivery_option, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11
            )
            "#,
        )
        .bind(&order.order_number)
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(items)
        .bind(order.subtotal.cents())
        .bind(order.tax_amount.cents())
        .bind(order.delivery_fee.cents())
        .bind(order.final_total.cents())
        .bind(order.service_type.as_str())
        .bind(order.delivery_option.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => {
                DbError::duplicate("order_number", order.order_number.clone())
            }
            other => other,
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Gets an order by its order number.
    pub async fn get_by_number(&self, order_number: &str) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT
                order_number, customer_name, customer_phone, items,
                subtotal_cents, tax_cents, delivery_fee_cents, final_total_cents,
                service_type, delivery_option, created_at
            FROM orders
            WHERE order_number = ?1
            "#,
        )
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// Returns the number of stored orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
