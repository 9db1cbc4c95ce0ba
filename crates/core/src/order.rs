//! Order domain enums: status, payment method, and report file type.
//!
//! Statuses and payment methods are stored in the database as their
//! uppercase string form; the enums here provide the validated conversions.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Order status
// ---------------------------------------------------------------------------

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Processing,
    Done,
    Canceled,
}

impl OrderStatus {
    /// Return the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Processing => "PROCESSING",
            Self::Done => "DONE",
            Self::Canceled => "CANCELED",
        }
    }

    /// Parse a status string, case-insensitively. Returns `None` for
    /// unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NEW" => Some(Self::New),
            "PROCESSING" => Some(Self::Processing),
            "DONE" => Some(Self::Done),
            "CANCELED" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// All valid status values.
    pub const ALL: &'static [&'static str] = &["NEW", "PROCESSING", "DONE", "CANCELED"];
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Payment method
// ---------------------------------------------------------------------------

/// How an order was (or will be) paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Cash,
    Paypal,
    GooglePay,
    ApplePay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "CARD",
            Self::Cash => "CASH",
            Self::Paypal => "PAYPAL",
            Self::GooglePay => "GOOGLE_PAY",
            Self::ApplePay => "APPLE_PAY",
        }
    }

    /// Parse a payment method string, case-insensitively.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CARD" => Some(Self::Card),
            "CASH" => Some(Self::Cash),
            "PAYPAL" => Some(Self::Paypal),
            "GOOGLE_PAY" => Some(Self::GooglePay),
            "APPLE_PAY" => Some(Self::ApplePay),
            _ => None,
        }
    }

    /// All valid payment method values.
    pub const ALL: &'static [&'static str] =
        &["CARD", "CASH", "PAYPAL", "GOOGLE_PAY", "APPLE_PAY"];
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Report file type
// ---------------------------------------------------------------------------

/// Output format for order report downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFileType {
    Csv,
    Xlsx,
}

impl ReportFileType {
    /// MIME type sent in the `Content-Type` response header.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// File extension used in the download filename.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Xlsx => ".xlsx",
        }
    }

    /// Resolve the requested file type. Absent or blank defaults to CSV;
    /// anything other than `csv`/`xlsx` (case-insensitive) is rejected
    /// before any report output is produced.
    pub fn from_param(value: Option<&str>) -> Result<Self, crate::error::CoreError> {
        match value {
            None => Ok(Self::Csv),
            Some(v) if v.trim().is_empty() => Ok(Self::Csv),
            Some(v) => match v.to_lowercase().as_str() {
                "csv" => Ok(Self::Csv),
                "xlsx" => Ok(Self::Xlsx),
                _ => Err(crate::error::CoreError::UnsupportedFormat(format!(
                    "Invalid file type: '{v}'. Allowed values: csv, xlsx"
                ))),
            },
        }
    }
}

impl std::fmt::Display for ReportFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Xlsx => f.write_str("xlsx"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    // -- OrderStatus tests ----------------------------------------------------

    #[test]
    fn status_round_trip() {
        for s in OrderStatus::ALL {
            let status = OrderStatus::from_str(s).unwrap();
            assert_eq!(status.as_str(), *s);
        }
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(OrderStatus::from_str("new"), Some(OrderStatus::New));
        assert_eq!(OrderStatus::from_str("Done"), Some(OrderStatus::Done));
    }

    #[test]
    fn status_unknown_returns_none() {
        assert!(OrderStatus::from_str("SHIPPED").is_none());
    }

    #[test]
    fn status_all_has_four_entries() {
        assert_eq!(OrderStatus::ALL.len(), 4);
    }

    // -- PaymentMethod tests --------------------------------------------------

    #[test]
    fn payment_round_trip() {
        for s in PaymentMethod::ALL {
            let method = PaymentMethod::from_str(s).unwrap();
            assert_eq!(method.as_str(), *s);
        }
    }

    #[test]
    fn payment_parse_is_case_insensitive() {
        assert_eq!(
            PaymentMethod::from_str("google_pay"),
            Some(PaymentMethod::GooglePay)
        );
    }

    #[test]
    fn payment_unknown_returns_none() {
        assert!(PaymentMethod::from_str("BITCOIN").is_none());
    }

    // -- ReportFileType tests -------------------------------------------------

    #[test]
    fn file_type_defaults_to_csv() {
        assert_eq!(ReportFileType::from_param(None).unwrap(), ReportFileType::Csv);
        assert_eq!(
            ReportFileType::from_param(Some("  ")).unwrap(),
            ReportFileType::Csv
        );
    }

    #[test]
    fn file_type_parses_known_values() {
        assert_eq!(
            ReportFileType::from_param(Some("csv")).unwrap(),
            ReportFileType::Csv
        );
        assert_eq!(
            ReportFileType::from_param(Some("XLSX")).unwrap(),
            ReportFileType::Xlsx
        );
    }

    #[test]
    fn file_type_rejects_unknown_value() {
        let err = ReportFileType::from_param(Some("pdf")).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("pdf"));
        assert!(err.to_string().contains("csv, xlsx"));
    }

    #[test]
    fn file_type_mime_and_extension() {
        assert_eq!(ReportFileType::Csv.mime_type(), "text/csv");
        assert_eq!(ReportFileType::Csv.extension(), ".csv");
        assert_eq!(
            ReportFileType::Xlsx.mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(ReportFileType::Xlsx.extension(), ".xlsx");
    }
}
