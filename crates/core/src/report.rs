//! Report filter and shared report constants.

use crate::error::{CoreError, CoreResult};
use crate::order::{OrderStatus, PaymentMethod, ReportFileType};
use crate::types::{DbId, Timestamp};

/// Column headers shared by the CSV and XLSX writers, in output order.
pub const REPORT_HEADERS: [&str; 8] = [
    "Order ID",
    "Customer ID",
    "Customer Name",
    "Email",
    "Amount",
    "Status",
    "Payment Method",
    "Created At",
];

/// Immutable filter for one report request. Absent terms impose no
/// constraint; present terms are ANDed by the query layer.
#[derive(Debug, Clone)]
pub struct ReportFilter {
    pub customer_id: Option<DbId>,
    pub status: Option<OrderStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub file_type: ReportFileType,
}

impl ReportFilter {
    /// Build a filter from raw request strings. Every invalid value is
    /// rejected here, before any query or output happens.
    pub fn from_raw(
        customer_id: Option<&str>,
        status: Option<&str>,
        payment_method: Option<&str>,
        file_type: Option<&str>,
    ) -> CoreResult<Self> {
        Ok(Self {
            customer_id: parse_optional_uuid(customer_id)?,
            status: parse_optional_status(status)?,
            payment_method: parse_optional_payment(payment_method)?,
            file_type: ReportFileType::from_param(file_type)?,
        })
    }
}

/// Parse an optional UUID string; absent or blank means "no value".
pub fn parse_optional_uuid(raw: Option<&str>) -> CoreResult<Option<DbId>> {
    match raw {
        Some(v) if !v.trim().is_empty() => DbId::parse_str(v.trim())
            .map(Some)
            .map_err(|_| CoreError::InvalidParameter(format!("Invalid UUID format: {v}"))),
        _ => Ok(None),
    }
}

/// Parse an optional status string against the known status values.
pub fn parse_optional_status(raw: Option<&str>) -> CoreResult<Option<OrderStatus>> {
    match raw {
        Some(v) if !v.trim().is_empty() => {
            OrderStatus::from_str(v.trim()).map(Some).ok_or_else(|| {
                CoreError::InvalidParameter(format!(
                    "Invalid status: '{v}'. Allowed values: [{}]",
                    OrderStatus::ALL.join(", ")
                ))
            })
        }
        _ => Ok(None),
    }
}

/// Parse an optional payment-method string against the known values.
pub fn parse_optional_payment(raw: Option<&str>) -> CoreResult<Option<PaymentMethod>> {
    match raw {
        Some(v) if !v.trim().is_empty() => {
            PaymentMethod::from_str(v.trim()).map(Some).ok_or_else(|| {
                CoreError::InvalidParameter(format!(
                    "Invalid payment method: '{v}'. Allowed values: [{}]",
                    PaymentMethod::ALL.join(", ")
                ))
            })
        }
        _ => Ok(None),
    }
}

/// Render a report timestamp as `yyyy-MM-dd HH:mm:ss` in the local system
/// time zone.
pub fn format_report_timestamp(ts: Timestamp) -> String {
    ts.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
