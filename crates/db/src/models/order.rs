//! Order models.
//!
//! Status and payment-method columns hold the uppercase string form of the
//! core enums; insert and update paths only ever receive values that were
//! validated against those enums, so the strings in these rows are valid by
//! construction.

use orders_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub customer_id: DbId,
    pub status: String,
    pub payment_method: Option<String>,
    pub amount: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An order joined with its customer, for detail views and listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderWithCustomer {
    pub id: DbId,
    pub status: String,
    pub payment_method: Option<String>,
    pub amount: f64,
    pub created_at: Timestamp,
    pub customer_id: DbId,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_city: String,
}

/// One joined row of the order report stream: exactly the eight report
/// columns, produced newest-first by the streaming query.
#[derive(Debug, Clone, FromRow)]
pub struct OrderReportRow {
    pub id: DbId,
    pub customer_id: DbId,
    pub customer_name: String,
    pub customer_email: String,
    pub amount: f64,
    pub status: String,
    pub payment_method: Option<String>,
    pub created_at: Timestamp,
}
