//! CSV report writer.
//!
//! One line per order after the fixed header, written record-by-record as
//! the row stream yields. Quoting is delegated to the `csv` crate: fields
//! containing a comma, double quote, or newline are wrapped in double
//! quotes with internal quotes doubled.

use std::io::Write;

use futures::{Stream, TryStreamExt};
use orders_core::report::{format_report_timestamp, REPORT_HEADERS};
use orders_db::models::order::OrderReportRow;

use super::ReportError;

/// Drive the row stream into `sink` as CSV.
pub async fn write_report<W: Write>(
    rows: impl Stream<Item = Result<OrderReportRow, sqlx::Error>> + Unpin,
    sink: W,
) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(REPORT_HEADERS)?;

    let mut rows = rows;
    while let Some(row) = rows.try_next().await? {
        writer.write_record(&record_fields(&row))?;
    }

    writer.flush()?;
    Ok(())
}

/// Render one order as its eight report fields, in column order.
fn record_fields(row: &OrderReportRow) -> [String; 8] {
    [
        row.id.to_string(),
        row.customer_id.to_string(),
        row.customer_name.clone(),
        row.customer_email.clone(),
        row.amount.to_string(),
        row.status.clone(),
        row.payment_method.clone().unwrap_or_default(),
        format_report_timestamp(row.created_at),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use orders_core::types::DbId;

    fn row(name: &str, email: &str, amount: f64, status: &str) -> OrderReportRow {
        OrderReportRow {
            id: DbId::new_v4(),
            customer_id: DbId::new_v4(),
            customer_name: name.to_string(),
            customer_email: email.to_string(),
            amount,
            status: status.to_string(),
            payment_method: Some("CARD".to_string()),
            created_at: chrono::Utc::now(),
        }
    }

    async fn render(rows: Vec<OrderReportRow>) -> String {
        let mut out = Vec::new();
        let stream = stream::iter(rows.into_iter().map(Ok));
        write_report(stream, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn header_is_written_even_for_empty_stream() {
        let output = render(Vec::new()).await;
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Order ID,Customer ID,Customer Name,Email,Amount,Status,Payment Method,Created At"
        );
        assert!(lines.next().is_none());
    }

    #[tokio::test]
    async fn one_line_per_row_in_stream_order() {
        let output = render(vec![
            row("Ada Lovelace", "ada@example.com", 100.5, "NEW"),
            row("Alan Turing", "alan@example.com", 7.0, "DONE"),
        ])
        .await;

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Ada Lovelace"));
        assert!(lines[1].contains("100.5"));
        assert!(lines[1].contains("NEW"));
        assert!(lines[2].contains("Alan Turing"));
    }

    #[tokio::test]
    async fn fields_with_commas_round_trip_through_a_csv_reader() {
        let output = render(vec![row("Lovelace, Ada", "ada@example.com", 10.0, "NEW")]).await;

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[2], "Lovelace, Ada");
    }

    #[tokio::test]
    async fn quotes_and_newlines_are_escaped() {
        let output = render(vec![row("Ada \"The Countess\"\nLovelace", "a@b.c", 1.0, "NEW")]).await;

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[2], "Ada \"The Countess\"\nLovelace");
    }

    #[tokio::test]
    async fn missing_payment_method_renders_empty() {
        let mut r = row("Ada", "a@b.c", 1.0, "NEW");
        r.payment_method = None;
        let output = render(vec![r]).await;

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[6], "");
    }

    #[tokio::test]
    async fn amount_uses_natural_decimal_form() {
        let output = render(vec![row("Ada", "a@b.c", 100.50, "NEW")]).await;
        assert!(output.contains(",100.5,"));
    }

    #[tokio::test]
    async fn stream_error_aborts_the_write() {
        let rows: Vec<Result<OrderReportRow, sqlx::Error>> =
            vec![Err(sqlx::Error::PoolClosed)];
        let mut out = Vec::new();
        let result = write_report(stream::iter(rows), &mut out).await;
        assert!(matches!(result, Err(ReportError::Database(_))));
    }
}
