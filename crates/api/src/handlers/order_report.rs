//! Handler for the streaming order report download.

use std::io::Cursor;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orders_core::report::ReportFilter;
use serde::Deserialize;

use crate::error::AppResult;
use crate::report;
use crate::state::AppState;

/// Request body for report generation. Every field is optional; an empty
/// object produces an unfiltered CSV report.
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilterRequest {
    pub customer_id: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub file_type: Option<String>,
}

/// POST /api/orders/_report
///
/// Generates a CSV or XLSX report of all orders matching the filter and
/// returns it as a download. The filename encodes a timestamp and the
/// format's extension; any generation failure discards the output.
pub async fn generate_report(
    State(state): State<AppState>,
    Json(body): Json<ReportFilterRequest>,
) -> AppResult<Response> {
    let filter = ReportFilter::from_raw(
        body.customer_id.as_deref(),
        body.status.as_deref(),
        body.payment_method.as_deref(),
        body.file_type.as_deref(),
    )?;

    let filename = format!(
        "orders_report_{}{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S"),
        filter.file_type.extension()
    );

    let mut cursor = Cursor::new(Vec::new());
    report::generate_report(&state.pool, &filter, &mut cursor).await?;
    let bytes = cursor.into_inner();

    tracing::info!(filename = %filename, size = bytes.len(), "Report generated");

    let headers = [
        (
            header::CONTENT_TYPE,
            filter.file_type.mime_type().to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
        (
            header::CACHE_CONTROL,
            "no-cache, no-store, must-revalidate".to_string(),
        ),
        (header::PRAGMA, "no-cache".to_string()),
        (header::EXPIRES, "0".to_string()),
    ];

    Ok((headers, bytes).into_response())
}
