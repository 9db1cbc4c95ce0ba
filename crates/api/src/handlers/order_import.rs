//! Handler for the bulk order import upload.

use axum::extract::{Multipart, State};
use axum::Json;
use orders_core::import::ImportResult;

use crate::error::{AppError, AppResult};
use crate::import::{import_orders, PgImportStore};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/orders/upload
///
/// Accepts a multipart upload with a `file` field containing a JSON array
/// of orders, and returns the import statistics. Per-record failures are
/// part of the result, not errors; a completed response can still report
/// failed lines.
pub async fn upload_orders(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportResult>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        tracing::info!(
            filename = filename.as_deref().unwrap_or("<unnamed>"),
            size = data.len(),
            "Received order import upload",
        );

        let store = PgImportStore { pool: &state.pool };
        let result =
            import_orders(&store, &data[..], filename.as_deref(), data.len() as u64).await?;

        return Ok(Json(DataResponse { data: result }));
    }

    Err(AppError::BadRequest(
        "Missing 'file' multipart field".to_string(),
    ))
}
