//! Route definitions for order management, reporting, and import.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{order_import, order_report, orders};
use crate::state::AppState;

/// Order routes mounted at `/orders`.
///
/// ```text
/// GET    /          -> list_orders
/// POST   /          -> create_order
/// GET    /{id}      -> get_order
/// PUT    /{id}      -> update_order
/// DELETE /{id}      -> delete_order
/// POST   /_list     -> list_filtered
/// POST   /_report   -> generate_report
/// POST   /upload    -> upload_orders
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route(
            "/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/_list", post(orders::list_filtered))
        .route("/_report", post(order_report::generate_report))
        .route(
            "/upload",
            post(order_import::upload_orders)
                // Above the 10 MiB import cap so the pipeline's own size
                // check is the one that rejects oversized uploads.
                .layer(DefaultBodyLimit::max(12 * 1024 * 1024)),
        )
}
