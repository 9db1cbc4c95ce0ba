//! Domain core for the orders backend.
//!
//! Pure types and validation shared by the database and API layers: entity
//! enums, the pagination/sort guard, import record validation, the streaming
//! JSON array scanner, and report constants. No database or HTTP
//! dependencies live here.

pub mod error;
pub mod import;
pub mod json_stream;
pub mod order;
pub mod pagination;
pub mod report;
pub mod types;
