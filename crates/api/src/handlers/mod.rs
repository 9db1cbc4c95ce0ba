//! HTTP handlers, grouped by entity.

pub mod customers;
pub mod order_import;
pub mod order_report;
pub mod orders;
