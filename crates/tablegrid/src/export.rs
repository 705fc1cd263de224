//! Writing reconstructed tables out: an xlsx workbook with one sheet per
//! table, CSV files, a JSON document, or an aligned text rendering.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use serde::Serialize;
use tablegrid_core::{ExtractWarning, TableGrid, TableRecord};

use crate::error::SourceError;

/// Longest sheet name spreadsheet applications accept.
pub const MAX_SHEET_NAME: usize = 31;

/// Name of a table's sheet (and CSV file stem): `Page_{p}_Table_{t}`,
/// truncated to [`MAX_SHEET_NAME`] characters.
pub fn sheet_name(record: &TableRecord) -> String {
    let name = format!("Page_{}_Table_{}", record.page_number, record.table_number);
    name.chars().take(MAX_SHEET_NAME).collect()
}

/// Write one grid as CSV rows.
pub fn write_csv<W: Write>(grid: &TableGrid, writer: W) -> Result<(), SourceError> {
    let mut csv = csv::WriterBuilder::new().flexible(false).from_writer(writer);
    for row in grid.rows() {
        csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write one `<sheet name>.csv` file per record into `dir`.
///
/// The directory is created if needed. Nothing is written, and no directory
/// is created, when `records` is empty.
pub fn write_csv_dir(records: &[TableRecord], dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    if records.is_empty() {
        tracing::warn!("no tables extracted, CSV output not created");
        return Ok(Vec::new());
    }
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(records.len());
    for record in records {
        let path = dir.join(format!("{}.csv", sheet_name(record)));
        write_csv(&record.grid, fs::File::create(&path)?)?;
        tracing::debug!(path = %path.display(), "wrote table");
        written.push(path);
    }
    tracing::info!(dir = %dir.display(), files = written.len(), "CSV output written");
    Ok(written)
}

/// Write every record to one workbook at `path`, one sheet per table named
/// by [`sheet_name`], grid rows starting at the first row.
///
/// Returns the number of sheets written. No file is created when `records`
/// is empty.
pub fn write_xlsx(records: &[TableRecord], path: &Path) -> Result<usize, SourceError> {
    if records.is_empty() {
        tracing::warn!("no tables extracted, workbook not created");
        return Ok(0);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    for record in records {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(record))?;
        for (r, row) in record.grid.rows().iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                if !text.is_empty() {
                    sheet.write_string(r as u32, c as u16, text)?;
                }
            }
        }
    }
    workbook.save(path)?;
    tracing::info!(path = %path.display(), sheets = records.len(), "workbook written");
    Ok(records.len())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    tables: Vec<JsonTable<'a>>,
    warnings: &'a [ExtractWarning],
}

#[derive(Serialize)]
struct JsonTable<'a> {
    name: String,
    #[serde(flatten)]
    record: &'a TableRecord,
}

/// Serialize records and warnings as one JSON document.
pub fn to_json(records: &[TableRecord], warnings: &[ExtractWarning]) -> Result<String, SourceError> {
    let report = JsonReport {
        tables: records
            .iter()
            .map(|record| JsonTable {
                name: sheet_name(record),
                record,
            })
            .collect(),
        warnings,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render records as `|`-separated, column-aligned text blocks.
pub fn render_text(records: &[TableRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let region = record.region;
        out.push_str(&format!(
            "--- Table {} (page {}, {}, region: [{}, {}, {}, {}]) ---\n",
            record.table_number,
            record.page_number,
            record.strategy,
            region.x,
            region.y,
            region.w,
            region.h,
        ));

        let rows = record.grid.rows();
        let mut widths = vec![1usize; record.grid.column_count()];
        for row in rows {
            for (ci, text) in row.iter().enumerate() {
                widths[ci] = widths[ci].max(text.chars().count());
            }
        }
        for row in rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(text, &width)| format!("{text:<width$}"))
                .collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablegrid_core::{CellStrategy, ExtractWarningCode, PixelBox};

    fn record(page: usize, table: usize, rows: &[&[&str]]) -> TableRecord {
        TableRecord {
            page_number: page,
            table_number: table,
            region: PixelBox::new(10, 20, 300, 100).unwrap(),
            strategy: CellStrategy::Ruled,
            grid: TableGrid::from_rows(
                rows.iter()
                    .map(|r| r.iter().map(|s| s.to_string()).collect())
                    .collect(),
            ),
        }
    }

    #[test]
    fn sheet_names() {
        assert_eq!(sheet_name(&record(1, 2, &[])), "Page_1_Table_2");
        let long = record(123_456_789_012, 345_678_901_234, &[]);
        assert_eq!(sheet_name(&long).chars().count(), MAX_SHEET_NAME);
        assert!(sheet_name(&long).starts_with("Page_123456789012_Table_"));
    }

    #[test]
    fn csv_quotes_when_needed() {
        let rec = record(1, 1, &[&["Item", "Price, USD"], &["Bolt \"M4\"", ""]]);
        let mut buf = Vec::new();
        write_csv(&rec.grid, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Item,\"Price, USD\"\n\"Bolt \"\"M4\"\"\",\n"
        );
    }

    #[test]
    fn csv_dir_one_file_per_table() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("tables");
        let records = vec![record(1, 1, &[&["a"]]), record(2, 3, &[&["b", "c"]])];
        let written = write_csv_dir(&records, &out).unwrap();
        assert_eq!(written.len(), 2);
        assert!(out.join("Page_1_Table_1.csv").exists());
        let second = fs::read_to_string(out.join("Page_2_Table_3.csv")).unwrap();
        assert_eq!(second, "b,c\n");
    }

    #[test]
    fn csv_dir_skipped_without_tables() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never");
        assert!(write_csv_dir(&[], &out).unwrap().is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn xlsx_one_sheet_per_table() {
        use calamine::{Data, Reader, Xlsx, open_workbook};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("tables.xlsx");
        let records = vec![
            record(1, 1, &[&["Item", "Qty"], &["Bolt", ""]]),
            record(2, 3, &[&["b", "c"]]),
        ];
        assert_eq!(write_xlsx(&records, &path).unwrap(), 2);

        let mut book: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(book.sheet_names(), vec!["Page_1_Table_1", "Page_2_Table_3"]);
        let first = book.worksheet_range("Page_1_Table_1").unwrap();
        assert_eq!(first.get_value((0, 0)), Some(&Data::String("Item".into())));
        assert_eq!(first.get_value((1, 0)), Some(&Data::String("Bolt".into())));
        let second = book.worksheet_range("Page_2_Table_3").unwrap();
        assert_eq!(second.get_value((0, 1)), Some(&Data::String("c".into())));
    }

    #[test]
    fn xlsx_skipped_without_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.xlsx");
        assert_eq!(write_xlsx(&[], &path).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn json_report_shape() {
        let warnings = vec![
            ExtractWarning::with_code(ExtractWarningCode::EmptyTable, "no cells detected")
                .on_page(1)
                .on_table(2),
        ];
        let json = to_json(&[record(1, 1, &[&["x", "y"]])], &warnings).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tables"][0]["name"], "Page_1_Table_1");
        assert_eq!(value["tables"][0]["page_number"], 1);
        assert_eq!(value["tables"][0]["grid"][0][1], "y");
        assert_eq!(value["warnings"][0]["table"], 2);
    }

    #[test]
    fn text_rendering_aligns_columns() {
        let text = render_text(&[record(2, 1, &[&["Name", "Qty"], &["Bolt", "12"]])]);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("--- Table 1 (page 2, ruled"));
        assert_eq!(lines[1], "| Name | Qty |");
        assert_eq!(lines[2], "| Bolt | 12  |");
    }
}
