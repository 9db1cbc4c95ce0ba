//! Route definitions for customer management.

use axum::routing::get;
use axum::Router;

use crate::handlers::customers;
use crate::state::AppState;

/// Customer routes mounted at `/customers`.
///
/// ```text
/// GET    /        -> list_customers
/// POST   /        -> create_customer
/// GET    /{id}    -> get_customer
/// PUT    /{id}    -> update_customer
/// DELETE /{id}    -> delete_customer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
}
