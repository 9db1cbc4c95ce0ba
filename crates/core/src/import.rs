//! Types, constants, and pure validation for the order import pipeline.
//!
//! A record flows through two pure stages with a customer-existence lookup
//! between them (the lookup needs the store, so it lives with the pipeline
//! driver, not here):
//!
//! 1. [`parse_stage`] — required-field and identifier-format checks.
//! 2. customer lookup (store capability).
//! 3. [`enum_stage`] — status / payment-method membership checks.
//!
//! Stages stop at the first failure, so every rejected record carries
//! exactly one [`ImportError`]. Per-record failures are data, not errors:
//! they accumulate in the run's result and never abort the import.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::order::{OrderStatus, PaymentMethod};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted upload size in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Validated records are flushed to the store in groups of this size, so
/// peak memory stays at one batch regardless of input length.
pub const IMPORT_BATCH_SIZE: usize = 50;

// Machine-stable reason strings attached to import errors.
pub const REASON_PARSE_ERROR: &str = "Parse error";
pub const REASON_MISSING_CUSTOMER_ID: &str = "Missing customer ID";
pub const REASON_INVALID_AMOUNT: &str = "Invalid amount";
pub const REASON_MISSING_STATUS: &str = "Missing status";
pub const REASON_INVALID_CUSTOMER_ID: &str = "Invalid customer ID format";
pub const REASON_CUSTOMER_NOT_FOUND: &str = "Customer not found";
pub const REASON_INVALID_STATUS: &str = "Invalid status";
pub const REASON_INVALID_PAYMENT: &str = "Invalid payment method";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One raw element of the uploaded JSON array, before validation.
///
/// Field names follow the upload file format (camelCase), with snake_case
/// accepted as an alias. Unknown keys are rejected so a typoed field name
/// surfaces as a parse error instead of silently dropping data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawOrderRecord {
    #[serde(default, alias = "order_id")]
    pub order_id: Option<String>,
    #[serde(default, alias = "customer_id")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "payment_method")]
    pub payment_method: Option<String>,
}

/// A record that passed the parse stage and is waiting on the customer
/// lookup.
#[derive(Debug, Clone)]
pub struct PendingRecord {
    pub customer_id: DbId,
    pub amount: f64,
    pub status_raw: String,
    pub payment_raw: String,
}

/// A fully validated record, ready for bulk persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidOrder {
    pub customer_id: DbId,
    pub amount: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
}

// ---------------------------------------------------------------------------
// Failures and results
// ---------------------------------------------------------------------------

/// Why one record was rejected. Converted into an [`ImportError`] by the
/// pipeline, which knows the record's array position.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFailure {
    pub reason: &'static str,
    pub details: String,
}

impl ImportFailure {
    fn new(reason: &'static str, details: impl Into<String>) -> Self {
        Self {
            reason,
            details: details.into(),
        }
    }
}

/// One rejected record: 1-based array position, machine-stable reason,
/// human-readable detail. Never mutated after creation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImportError {
    pub line_number: u32,
    pub reason: &'static str,
    pub details: String,
}

/// Final accounting of one import run. `successful_imports +
/// failed_imports == total_records` always holds; errors are ordered by
/// first occurrence during the scan.
#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub total_records: u32,
    pub successful_imports: u32,
    pub failed_imports: u32,
    pub errors: Vec<ImportError>,
}

impl ImportResult {
    pub fn new(total_records: u32, successful_imports: u32, errors: Vec<ImportError>) -> Self {
        Self {
            total_records,
            successful_imports,
            failed_imports: total_records - successful_imports,
            errors,
        }
    }
}

// ---------------------------------------------------------------------------
// Upload preconditions
// ---------------------------------------------------------------------------

/// Check the upload itself (not its contents) before any parsing begins:
/// non-empty, a `.json` name, and within [`MAX_UPLOAD_BYTES`].
pub fn validate_upload(declared_name: Option<&str>, declared_size: u64) -> CoreResult<()> {
    if declared_size == 0 {
        return Err(CoreError::InvalidInput(
            "Uploaded file is empty".to_string(),
        ));
    }

    let is_json = declared_name
        .map(|n| n.to_lowercase().ends_with(".json"))
        .unwrap_or(false);
    if !is_json {
        return Err(CoreError::InvalidInput(
            "Only JSON files are allowed".to_string(),
        ));
    }

    if declared_size > MAX_UPLOAD_BYTES {
        return Err(CoreError::InvalidInput(
            "File size exceeds maximum allowed size of 10MB".to_string(),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Validation stages
// ---------------------------------------------------------------------------

/// Required-field and identifier checks, in fixed order: customer id
/// present, amount positive, status present, customer id a valid UUID.
pub fn parse_stage(record: &RawOrderRecord) -> Result<PendingRecord, ImportFailure> {
    let customer_raw = match record.customer_id.as_deref() {
        Some(c) if !c.trim().is_empty() => c,
        _ => {
            return Err(ImportFailure::new(
                REASON_MISSING_CUSTOMER_ID,
                "customer_id is required",
            ))
        }
    };

    let amount = match record.amount {
        Some(a) if a > 0.0 => a,
        other => {
            let shown = other.map_or_else(|| "null".to_string(), |a| a.to_string());
            return Err(ImportFailure::new(
                REASON_INVALID_AMOUNT,
                format!("Amount must be positive, got: {shown}"),
            ));
        }
    };

    let status_raw = match record.status.as_deref() {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => return Err(ImportFailure::new(REASON_MISSING_STATUS, "status is required")),
    };

    let customer_id = DbId::parse_str(customer_raw).map_err(|_| {
        ImportFailure::new(
            REASON_INVALID_CUSTOMER_ID,
            format!("Expected UUID, got: {customer_raw}"),
        )
    })?;

    Ok(PendingRecord {
        customer_id,
        amount,
        status_raw,
        payment_raw: record.payment_method.clone().unwrap_or_default(),
    })
}

/// Membership checks against the known status and payment-method values.
/// Runs after the customer-existence lookup.
pub fn enum_stage(pending: PendingRecord) -> Result<ValidOrder, ImportFailure> {
    let status = OrderStatus::from_str(&pending.status_raw).ok_or_else(|| {
        ImportFailure::new(
            REASON_INVALID_STATUS,
            format!("Unknown status: {}", pending.status_raw),
        )
    })?;

    let payment_method = PaymentMethod::from_str(&pending.payment_raw).ok_or_else(|| {
        ImportFailure::new(
            REASON_INVALID_PAYMENT,
            format!("Unknown payment method: {}", pending.payment_raw),
        )
    })?;

    Ok(ValidOrder {
        customer_id: pending.customer_id,
        amount: pending.amount,
        status,
        payment_method,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
