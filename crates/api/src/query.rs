//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Raw pagination parameters (`?page=&size=&sort=`).
///
/// Values stay as submitted strings so the pagination guard can report the
/// exact offending input; `sort` is a comma-separated list of
/// `field[:asc|:desc]` terms.
#[derive(Debug, Default, Deserialize)]
pub struct PageableParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}
