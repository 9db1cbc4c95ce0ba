//! Repository for the `customers` table.

use orders_core::pagination::PageRequest;
use orders_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::repositories::build_order_clause;

/// Column list for `customers` queries.
const CUSTOMER_COLUMNS: &str = "\
    id, first_name, last_name, email, phone, city, created_at, updated_at";

/// Map an API sort field to its column. Matches the customer listing's
/// sort whitelist.
pub(crate) fn sort_column(field: &str) -> Option<&'static str> {
    match field {
        "first_name" => Some("first_name"),
        "last_name" => Some("last_name"),
        "city" => Some("city"),
        _ => None,
    }
}

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer. The `uq_customers_email` constraint turns a
    /// duplicate email into a database error the API layer maps to 409.
    pub async fn create(pool: &PgPool, data: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers (first_name, last_name, email, phone, city) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(&data.city)
            .fetch_one(pool)
            .await
    }

    /// Find a customer by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists_by_id(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn exists_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM customers WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// List one page of customers, sorted per the validated page request.
    pub async fn list(pool: &PgPool, page: &PageRequest) -> Result<Vec<Customer>, sqlx::Error> {
        let order_clause = build_order_clause(&page.sort, sort_column, "created_at DESC");
        let query = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             ORDER BY {order_clause} \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(pool)
            .await
    }

    /// Update a customer; absent fields keep their current value.
    ///
    /// Returns `None` if no customer with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        data: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET \
                 first_name = COALESCE($2, first_name), \
                 last_name = COALESCE($3, last_name), \
                 email = COALESCE($4, email), \
                 phone = COALESCE($5, phone), \
                 city = COALESCE($6, city), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(&data.city)
            .fetch_optional(pool)
            .await
    }

    /// Delete a customer (orders cascade). Returns whether a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
