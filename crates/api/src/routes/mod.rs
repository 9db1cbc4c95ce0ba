pub mod customers;
pub mod health;
pub mod orders;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /customers               list (paginated, sortable), create
/// /customers/{id}          get, update, delete
///
/// /orders                  list (paginated, sortable), create
/// /orders/{id}             get, update, delete
/// /orders/_list            filtered, paginated listing (POST)
/// /orders/_report          CSV/XLSX report download (POST)
/// /orders/upload           bulk JSON import (POST, multipart)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/customers", customers::router())
        .nest("/orders", orders::router())
}
