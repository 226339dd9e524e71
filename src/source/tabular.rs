//! Spreadsheet sources.
//!
//! Workbooks are opened with `calamine` and only the first worksheet is used.
//! Its first row supplies the column names; every other row becomes one record
//! whose text is the row's cells joined with commas. Rows are written back as
//! header-less CSV with the same number of columns.

use super::RecordFormat;
use crate::error::{ExtractError, Result, ResultExt as _};
use crate::record::{Record, SourceContents, SourceShape};
use calamine::{Data, DataType as _, Reader as _, open_workbook_auto};
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct TabularSource {
    /// Column names used when serializing; ignored when reading.
    columns: Vec<String>,
}

impl TabularSource {
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

/// Layout used for date and time cells.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render one cell the way it appears in record text.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(true) => "True".to_owned(),
        Data::Bool(false) => "False".to_owned(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(datetime) => datetime.format(DATETIME_FORMAT).to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

/// Header names, with blank headers replaced by a positional placeholder.
fn header_names(row: &[Data]) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_text(cell);
            if name.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                name
            }
        })
        .collect()
}

fn unsupported(path: &Path, reason: impl Into<String>) -> ExtractError {
    ExtractError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

impl RecordFormat for TabularSource {
    fn read(&self, path: &Path) -> Result<SourceContents> {
        // Surface a missing file as an I/O problem rather than a parse problem
        std::fs::metadata(path).read_context(path)?;

        let mut workbook =
            open_workbook_auto(path).map_err(|e| unsupported(path, e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| unsupported(path, "workbook has no worksheets"))?
            .map_err(|e| unsupported(path, e.to_string()))?;

        let mut rows = range.rows();
        let columns = rows
            .next()
            .map(header_names)
            .ok_or_else(|| unsupported(path, "first worksheet is empty"))?;

        let records: Vec<Record> = rows
            .map(|row| {
                let mut cells: Vec<String> = row.iter().map(cell_text).collect();
                cells.resize(columns.len(), String::new());
                Record::row(&cells)
            })
            .collect();

        log::info!(
            "Read {} rows with {} columns from {}",
            records.len(),
            columns.len(),
            path.display()
        );

        Ok(SourceContents {
            records,
            shape: SourceShape::Structured { columns },
        })
    }

    fn serialize(&self, records: &[Record], out: &mut dyn Write) -> io::Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);

        for record in records {
            writer.write_record(record.fields(self.columns.len()))?;
        }
        writer.flush()
    }
}
