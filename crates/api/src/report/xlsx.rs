//! Streaming XLSX report writer.
//!
//! An `.xlsx` file is a zip archive of OOXML parts. The static parts
//! (content types, relationships, workbook, styles) are written up front;
//! the worksheet part is then streamed row by row through a fixed-size
//! window: serialized rows accumulate until [`ROW_WINDOW`] is reached and
//! are then flushed into the archive, so no full in-memory workbook ever
//! exists. Cell values are inline strings (no shared-strings table, which
//! would have to be buffered whole); the amount column is numeric.

use std::io::{Seek, Write};

use futures::{Stream, TryStreamExt};
use orders_core::report::{format_report_timestamp, REPORT_HEADERS};
use orders_db::models::order::OrderReportRow;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::ReportError;

/// Rows buffered before a flush to the archive.
const ROW_WINDOW: usize = 100;

/// Style indexes defined in `styles.xml`.
const STYLE_HEADER: u32 = 1;
const STYLE_DATA: u32 = 2;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Orders" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Style 1: bold, grey fill, thin borders, centered (header row).
/// Style 2: thin borders only (data rows).
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FFD9D9D9"/></patternFill></fill></fills><borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border><border><left style="thin"/><right style="thin"/><top style="thin"/><bottom style="thin"/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="2" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1" applyAlignment="1"><alignment horizontal="center"/></xf><xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1"/></cellXfs></styleSheet>"#;

const SHEET_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#;

const SHEET_EPILOG: &str = "</sheetData></worksheet>";

/// Drive the row stream into `sink` as a streamed XLSX workbook.
pub async fn write_report<W: Write + Seek>(
    rows: impl Stream<Item = Result<OrderReportRow, sqlx::Error>> + Unpin,
    sink: W,
) -> Result<(), ReportError> {
    let mut writer = XlsxReportWriter::new(sink)?;

    let mut rows = rows;
    while let Some(row) = rows.try_next().await? {
        writer.append_row(&row)?;
    }

    writer.finish()?;
    Ok(())
}

/// Window-buffered worksheet writer over a zip archive.
pub struct XlsxReportWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    /// Serialized `<row>` elements waiting to be flushed.
    window: Vec<String>,
    /// 1-based index of the next worksheet row.
    next_row: u32,
}

impl<W: Write + Seek> XlsxReportWriter<W> {
    /// Write the static workbook parts, open the worksheet part, and emit
    /// the styled header row.
    pub fn new(sink: W) -> Result<Self, ReportError> {
        let mut zip = ZipWriter::new(sink);
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES.as_bytes())?;
        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS.as_bytes())?;
        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(WORKBOOK.as_bytes())?;
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(WORKBOOK_RELS.as_bytes())?;
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(STYLES.as_bytes())?;

        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(SHEET_PROLOG.as_bytes())?;

        let mut header = String::from("<row r=\"1\">");
        for (col, title) in REPORT_HEADERS.iter().enumerate() {
            header.push_str(&inline_string_cell(col, 1, STYLE_HEADER, title));
        }
        header.push_str("</row>");
        zip.write_all(header.as_bytes())?;

        Ok(Self {
            zip,
            window: Vec::with_capacity(ROW_WINDOW),
            next_row: 2,
        })
    }

    /// Serialize one order into the row window, flushing the window to the
    /// archive when it is full.
    pub fn append_row(&mut self, row: &OrderReportRow) -> Result<(), ReportError> {
        let r = self.next_row;
        self.next_row += 1;

        let payment = row.payment_method.as_deref().unwrap_or_default();
        let mut xml = format!("<row r=\"{r}\">");
        xml.push_str(&inline_string_cell(0, r, STYLE_DATA, &row.id.to_string()));
        xml.push_str(&inline_string_cell(1, r, STYLE_DATA, &row.customer_id.to_string()));
        xml.push_str(&inline_string_cell(2, r, STYLE_DATA, &row.customer_name));
        xml.push_str(&inline_string_cell(3, r, STYLE_DATA, &row.customer_email));
        xml.push_str(&number_cell(4, r, STYLE_DATA, row.amount));
        xml.push_str(&inline_string_cell(5, r, STYLE_DATA, &row.status));
        xml.push_str(&inline_string_cell(6, r, STYLE_DATA, payment));
        xml.push_str(&inline_string_cell(
            7,
            r,
            STYLE_DATA,
            &format_report_timestamp(row.created_at),
        ));
        xml.push_str("</row>");

        self.window.push(xml);
        if self.window.len() >= ROW_WINDOW {
            self.flush_window()?;
        }
        Ok(())
    }

    /// Close the worksheet and the archive, returning the sink.
    pub fn finish(mut self) -> Result<W, ReportError> {
        self.flush_window()?;
        self.zip.write_all(SHEET_EPILOG.as_bytes())?;
        Ok(self.zip.finish()?)
    }

    fn flush_window(&mut self) -> Result<(), ReportError> {
        for row_xml in self.window.drain(..) {
            self.zip.write_all(row_xml.as_bytes())?;
        }
        Ok(())
    }
}

/// Column letter for a zero-based column index (eight columns: A..H).
fn column_letter(col: usize) -> char {
    (b'A' + col as u8) as char
}

fn inline_string_cell(col: usize, row: u32, style: u32, value: &str) -> String {
    format!(
        "<c r=\"{}{row}\" s=\"{style}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
        column_letter(col),
        xml_escape(value)
    )
}

fn number_cell(col: usize, row: u32, style: u32, value: f64) -> String {
    format!("<c r=\"{}{row}\" s=\"{style}\"><v>{value}</v></c>", column_letter(col))
}

fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use orders_core::types::DbId;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn row(name: &str, amount: f64) -> OrderReportRow {
        OrderReportRow {
            id: DbId::new_v4(),
            customer_id: DbId::new_v4(),
            customer_name: name.to_string(),
            customer_email: "a@example.com".to_string(),
            amount,
            status: "NEW".to_string(),
            payment_method: Some("CARD".to_string()),
            created_at: chrono::Utc::now(),
        }
    }

    async fn render(rows: Vec<OrderReportRow>) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let stream = stream::iter(rows.into_iter().map(Ok));
        write_report(stream, &mut cursor).await.unwrap();
        cursor.into_inner()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    #[tokio::test]
    async fn produces_a_readable_archive_with_all_parts() {
        let bytes = render(vec![row("Ada", 10.0)]).await;
        let archive = ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(names.contains(&expected), "missing part: {expected}");
        }
    }

    #[tokio::test]
    async fn sheet_is_named_orders() {
        let bytes = render(Vec::new()).await;
        let workbook = read_part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains("name=\"Orders\""));
    }

    #[tokio::test]
    async fn empty_stream_yields_header_row_only() {
        let bytes = render(Vec::new()).await;
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert_eq!(sheet.matches("<row ").count(), 1);
        assert!(sheet.contains("Order ID"));
        assert!(sheet.contains("Created At"));
    }

    #[tokio::test]
    async fn one_row_per_order_with_numeric_amount() {
        let bytes = render(vec![row("Ada", 100.5), row("Alan", 7.0)]).await;
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert_eq!(sheet.matches("<row ").count(), 3);
        assert!(sheet.contains("<v>100.5</v>"));
        assert!(sheet.contains("<v>7</v>"));
        // Amount cells carry no inlineStr marker.
        assert!(sheet.contains("<c r=\"E2\" s=\"2\"><v>100.5</v></c>"));
    }

    #[tokio::test]
    async fn header_and_data_rows_use_distinct_styles() {
        let bytes = render(vec![row("Ada", 10.0)]).await;
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<c r=\"A1\" s=\"1\""));
        assert!(sheet.contains("<c r=\"A2\" s=\"2\""));
    }

    #[tokio::test]
    async fn special_characters_are_xml_escaped() {
        let bytes = render(vec![row("A & B <Ltd>", 10.0)]).await;
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("A &amp; B &lt;Ltd&gt;"));
        assert!(!sheet.contains("<Ltd>"));
    }

    #[tokio::test]
    async fn window_flushing_preserves_every_row() {
        let rows: Vec<OrderReportRow> =
            (0..(ROW_WINDOW * 2 + 50)).map(|i| row("Ada", i as f64 + 1.0)).collect();
        let count = rows.len();
        let bytes = render(rows).await;
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert_eq!(sheet.matches("<row ").count(), count + 1);
        // Last row index is header + count.
        assert!(sheet.contains(&format!("<row r=\"{}\">", count + 1)));
    }

    #[tokio::test]
    async fn stream_error_aborts_the_write() {
        let rows: Vec<Result<OrderReportRow, sqlx::Error>> =
            vec![Err(sqlx::Error::PoolClosed)];
        let mut cursor = Cursor::new(Vec::new());
        let result = write_report(stream::iter(rows), &mut cursor).await;
        assert!(matches!(result, Err(ReportError::Database(_))));
    }
}
