//! Streaming order import pipeline.
//!
//! Ingests a JSON array upload one element at a time: each record is
//! decoded and validated independently, valid entities accumulate into
//! fixed-size batches that are bulk-inserted and cleared, and per-record
//! failures are collected as data without aborting the run. Neither the
//! whole input nor the whole output is ever in memory at once.
//!
//! A bulk-insert failure IS fatal: it aborts the remainder of the run
//! while batches flushed earlier stay persisted. There is no compensating
//! rollback, so a mid-run abort leaves a documented inconsistency window
//! the caller must be aware of.

use std::io::Read;

use async_trait::async_trait;
use orders_core::import::{
    enum_stage, parse_stage, validate_upload, ImportError, ImportFailure, ImportResult,
    RawOrderRecord, ValidOrder, IMPORT_BATCH_SIZE, REASON_CUSTOMER_NOT_FOUND,
    REASON_PARSE_ERROR,
};
use orders_core::json_stream::JsonArrayScanner;
use orders_core::types::DbId;
use orders_db::repositories::{CustomerRepo, OrderRepo};
use orders_db::DbPool;

use crate::error::AppResult;

// ---------------------------------------------------------------------------
// Store capability
// ---------------------------------------------------------------------------

/// The two store capabilities the pipeline consumes: a reference lookup
/// and an atomic bulk write.
#[async_trait]
pub trait ImportStore {
    async fn customer_exists(&self, id: DbId) -> Result<bool, sqlx::Error>;

    /// Insert a batch atomically: a failure persists none of it.
    async fn insert_orders(&self, orders: &[ValidOrder]) -> Result<(), sqlx::Error>;
}

/// Production store backed by the repositories.
pub struct PgImportStore<'a> {
    pub pool: &'a DbPool,
}

#[async_trait]
impl ImportStore for PgImportStore<'_> {
    async fn customer_exists(&self, id: DbId) -> Result<bool, sqlx::Error> {
        CustomerRepo::exists_by_id(self.pool, id).await
    }

    async fn insert_orders(&self, orders: &[ValidOrder]) -> Result<(), sqlx::Error> {
        OrderRepo::bulk_insert(self.pool, orders).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run one import over `reader`, which must contain a JSON array of order
/// records.
///
/// `declared_name` and `declared_size` describe the upload itself and are
/// checked before any parsing. The returned [`ImportResult`] accounts for
/// every array element; its error list is ordered by first occurrence.
pub async fn import_orders<R, S>(
    store: &S,
    reader: R,
    declared_name: Option<&str>,
    declared_size: u64,
) -> AppResult<ImportResult>
where
    R: Read + Send,
    S: ImportStore + Sync,
{
    validate_upload(declared_name, declared_size)?;

    let mut scanner = JsonArrayScanner::new(reader)?;

    let mut errors: Vec<ImportError> = Vec::new();
    let mut batch: Vec<ValidOrder> = Vec::with_capacity(IMPORT_BATCH_SIZE);
    let mut total: u32 = 0;
    let mut successful: u32 = 0;

    while let Some(element) = scanner.next_element() {
        total += 1;
        let line_number = total;

        let raw = match element {
            Ok(bytes) => bytes,
            Err(e) => {
                // Broken array framing: attribute one parse error to this
                // position, then stop — nothing after it can be located.
                errors.push(ImportError {
                    line_number,
                    reason: REASON_PARSE_ERROR,
                    details: e.to_string(),
                });
                tracing::warn!(line = line_number, error = %e, "Import stream framing error");
                break;
            }
        };

        let record: RawOrderRecord = match serde_json::from_slice(raw) {
            Ok(record) => record,
            Err(e) => {
                errors.push(ImportError {
                    line_number,
                    reason: REASON_PARSE_ERROR,
                    details: e.to_string(),
                });
                continue;
            }
        };

        match validate_record(store, &record).await? {
            Ok(order) => {
                batch.push(order);
                successful += 1;

                if batch.len() >= IMPORT_BATCH_SIZE {
                    store.insert_orders(&batch).await?;
                    batch.clear();
                }
            }
            Err(failure) => {
                errors.push(ImportError {
                    line_number,
                    reason: failure.reason,
                    details: failure.details,
                });
            }
        }
    }

    // Flush the remainder.
    if !batch.is_empty() {
        store.insert_orders(&batch).await?;
    }

    tracing::info!(
        total,
        successful,
        failed = total - successful,
        "Import completed",
    );

    Ok(ImportResult::new(total, successful, errors))
}

/// Validate one decoded record: pure field checks, then the customer
/// lookup, then the enum membership checks. Store errors are fatal; a
/// per-record rejection is returned as the inner `Err`.
async fn validate_record<S: ImportStore + Sync>(
    store: &S,
    record: &RawOrderRecord,
) -> Result<Result<ValidOrder, ImportFailure>, sqlx::Error> {
    let pending = match parse_stage(record) {
        Ok(pending) => pending,
        Err(failure) => return Ok(Err(failure)),
    };

    if !store.customer_exists(pending.customer_id).await? {
        return Ok(Err(ImportFailure {
            reason: REASON_CUSTOMER_NOT_FOUND,
            details: format!("No customer with ID: {}", pending.customer_id),
        }));
    }

    Ok(enum_stage(pending))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
