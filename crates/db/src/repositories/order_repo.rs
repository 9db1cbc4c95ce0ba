//! Repository for the `orders` table.
//!
//! Listing and detail queries join the customer row; the report query
//! streams joined rows lazily through a server-side cursor (`fetch`), so
//! result sets of any size are processed without materializing them.

use futures::stream::BoxStream;
use orders_core::import::ValidOrder;
use orders_core::order::{OrderStatus, PaymentMethod};
use orders_core::pagination::PageRequest;
use orders_core::types::DbId;
use sqlx::{PgPool, QueryBuilder};

use crate::models::order::{Order, OrderReportRow, OrderWithCustomer};
use crate::repositories::build_order_clause;

/// Column list for plain `orders` queries.
const ORDER_COLUMNS: &str = "\
    id, customer_id, status, payment_method, amount, created_at, updated_at";

/// Column list for order + customer joins.
const ORDER_JOIN_COLUMNS: &str = "\
    o.id, o.status, o.payment_method, o.amount, o.created_at, \
    c.id AS customer_id, c.first_name AS customer_first_name, \
    c.last_name AS customer_last_name, c.email AS customer_email, \
    c.phone AS customer_phone, c.city AS customer_city";

/// Optional filter terms, ANDed; absent terms impose no constraint.
const FILTER_CLAUSE: &str = "\
    ($1::uuid IS NULL OR o.customer_id = $1) AND \
    ($2::text IS NULL OR o.status = $2) AND \
    ($3::text IS NULL OR o.payment_method = $3)";

/// The report stream: the eight report columns, newest order first.
const REPORT_QUERY: &str = "\
    SELECT o.id, o.customer_id, \
           c.first_name || ' ' || c.last_name AS customer_name, \
           c.email AS customer_email, \
           o.amount, o.status, o.payment_method, o.created_at \
    FROM orders o \
    JOIN customers c ON c.id = o.customer_id \
    WHERE ($1::uuid IS NULL OR o.customer_id = $1) AND \
          ($2::text IS NULL OR o.status = $2) AND \
          ($3::text IS NULL OR o.payment_method = $3) \
    ORDER BY o.created_at DESC";

/// Map an API sort field to its column. Matches the order listing's sort
/// whitelist.
pub(crate) fn sort_column(field: &str) -> Option<&'static str> {
    match field {
        "status" => Some("o.status"),
        "payment_method" => Some("o.payment_method"),
        "amount" => Some("o.amount"),
        _ => None,
    }
}

/// Provides CRUD, filtered listing, streaming, and bulk-insert operations
/// for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert one validated order.
    pub async fn create(pool: &PgPool, order: &ValidOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders (customer_id, status, payment_method, amount) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(order.customer_id)
            .bind(order.status.as_str())
            .bind(order.payment_method.as_str())
            .bind(order.amount)
            .fetch_one(pool)
            .await
    }

    /// Find an order with its customer by ID.
    pub async fn find_with_customer(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OrderWithCustomer>, sqlx::Error> {
        let query = format!(
            "SELECT {ORDER_JOIN_COLUMNS} \
             FROM orders o JOIN customers c ON c.id = o.customer_id \
             WHERE o.id = $1"
        );
        sqlx::query_as::<_, OrderWithCustomer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of orders with customers, sorted per the validated
    /// page request.
    pub async fn list_with_customer(
        pool: &PgPool,
        page: &PageRequest,
    ) -> Result<Vec<OrderWithCustomer>, sqlx::Error> {
        let order_clause = build_order_clause(&page.sort, sort_column, "o.created_at DESC");
        let query = format!(
            "SELECT {ORDER_JOIN_COLUMNS} \
             FROM orders o JOIN customers c ON c.id = o.customer_id \
             ORDER BY {order_clause} \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, OrderWithCustomer>(&query)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(pool)
            .await
    }

    /// One filtered page of orders with customers, newest first.
    pub async fn find_by_filters(
        pool: &PgPool,
        customer_id: Option<DbId>,
        status: Option<OrderStatus>,
        payment_method: Option<PaymentMethod>,
        page: &PageRequest,
    ) -> Result<Vec<OrderWithCustomer>, sqlx::Error> {
        let query = format!(
            "SELECT {ORDER_JOIN_COLUMNS} \
             FROM orders o JOIN customers c ON c.id = o.customer_id \
             WHERE {FILTER_CLAUSE} \
             ORDER BY o.created_at DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, OrderWithCustomer>(&query)
            .bind(customer_id)
            .bind(status.map(|s| s.as_str()))
            .bind(payment_method.map(|p| p.as_str()))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_filters(
        pool: &PgPool,
        customer_id: Option<DbId>,
        status: Option<OrderStatus>,
        payment_method: Option<PaymentMethod>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM orders o WHERE {FILTER_CLAUSE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(customer_id)
            .bind(status.map(|s| s.as_str()))
            .bind(payment_method.map(|p| p.as_str()))
            .fetch_one(pool)
            .await
    }

    /// Stream filtered report rows lazily, ordered by creation time
    /// descending. The returned stream holds a database cursor; dropping
    /// it on any exit path releases the connection.
    pub fn stream_by_filters(
        pool: &PgPool,
        customer_id: Option<DbId>,
        status: Option<OrderStatus>,
        payment_method: Option<PaymentMethod>,
    ) -> BoxStream<'_, Result<OrderReportRow, sqlx::Error>> {
        sqlx::query_as::<_, OrderReportRow>(REPORT_QUERY)
            .bind(customer_id)
            .bind(status.map(|s| s.as_str()))
            .bind(payment_method.map(|p| p.as_str()))
            .fetch(pool)
    }

    /// Update an order's mutable fields. Returns `None` if no order with
    /// the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        status: OrderStatus,
        payment_method: PaymentMethod,
        amount: f64,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET \
                 status = $2, payment_method = $3, amount = $4, updated_at = now() \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(payment_method.as_str())
            .bind(amount)
            .fetch_optional(pool)
            .await
    }

    /// Delete an order. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert a batch of validated orders in one statement.
    ///
    /// The insert is atomic: a failure persists none of the batch.
    pub async fn bulk_insert(pool: &PgPool, orders: &[ValidOrder]) -> Result<u64, sqlx::Error> {
        if orders.is_empty() {
            return Ok(0);
        }

        let mut builder =
            QueryBuilder::new("INSERT INTO orders (customer_id, status, payment_method, amount) ");
        builder.push_values(orders, |mut row, order| {
            row.push_bind(order.customer_id)
                .push_bind(order.status.as_str())
                .push_bind(order.payment_method.as_str())
                .push_bind(order.amount);
        });

        let result = builder.build().execute(pool).await?;
        tracing::debug!(rows = result.rows_affected(), "Bulk-inserted orders");
        Ok(result.rows_affected())
    }
}
