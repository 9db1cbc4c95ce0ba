//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Sort fields reach this
//! layer already validated by the pagination guard; the per-entity column
//! maps below translate them to real columns, so ORDER BY clauses are only
//! ever assembled from statically-known strings.

pub mod customer_repo;
pub mod order_repo;

pub use customer_repo::CustomerRepo;
pub use order_repo::OrderRepo;

use orders_core::pagination::SortTerm;

/// Build an ORDER BY clause from validated sort terms. Terms without a
/// column mapping are skipped; with no usable terms, `default` applies.
pub(crate) fn build_order_clause(
    sort: &[SortTerm],
    column_for: fn(&str) -> Option<&'static str>,
    default: &'static str,
) -> String {
    let parts: Vec<String> = sort
        .iter()
        .filter_map(|term| {
            column_for(&term.field).map(|col| format!("{col} {}", term.direction.as_sql()))
        })
        .collect();

    if parts.is_empty() {
        default.to_string()
    } else {
        parts.join(", ")
    }
}
