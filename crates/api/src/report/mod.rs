//! Streaming order report generation.
//!
//! A report is produced by driving a format writer exactly once over the
//! lazy row stream from [`OrderRepo::stream_by_filters`]: one output record
//! per input record, after a fixed header row. Only a small, constant
//! number of records is ever in memory, regardless of result size.
//!
//! The row stream holds a database cursor. It is owned by
//! [`generate_report`] and dropped on every exit path — normal completion
//! or writer failure — so a failed report never leaks an open cursor. Any
//! failure maps to [`CoreError::ReportGeneration`]; partial output must be
//! discarded by the caller.

pub mod csv;
pub mod xlsx;

use std::io::{Seek, Write};

use orders_core::error::CoreError;
use orders_core::order::ReportFileType;
use orders_core::report::ReportFilter;
use orders_db::repositories::OrderRepo;
use orders_db::DbPool;

/// Failure while producing a report, carrying the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl From<ReportError> for CoreError {
    fn from(err: ReportError) -> Self {
        CoreError::ReportGeneration(err.to_string())
    }
}

/// Generate a report for the given filter into `sink`.
///
/// The writer strategy is chosen by `filter.file_type`; unknown formats
/// never reach this point (they are rejected while the filter is built).
pub async fn generate_report<W: Write + Seek>(
    pool: &DbPool,
    filter: &ReportFilter,
    sink: W,
) -> Result<(), CoreError> {
    tracing::info!(
        file_type = %filter.file_type,
        customer_id = ?filter.customer_id,
        status = ?filter.status,
        payment_method = ?filter.payment_method,
        "Generating order report",
    );

    let rows = OrderRepo::stream_by_filters(
        pool,
        filter.customer_id,
        filter.status,
        filter.payment_method,
    );

    let result = match filter.file_type {
        ReportFileType::Csv => csv::write_report(rows, sink).await,
        ReportFileType::Xlsx => xlsx::write_report(rows, sink).await,
    };

    result.map_err(CoreError::from)
}
