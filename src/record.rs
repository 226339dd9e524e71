//! Core data model: records, source shapes and what a reader hands back.

use std::fmt;

/// Separator used when flattening a spreadsheet row into record text.
pub const FIELD_SEPARATOR: char = ',';

/// One line of a text file or one row of a spreadsheet.
///
/// A record keeps its raw text exactly as read, so a text line still carries its
/// trailing newline. Comparisons that decide whether two records are "the same"
/// go through [`Record::key`], which ignores that newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    raw: String,
    /// Column count of the originating row, `None` for text lines.
    width: Option<usize>,
}

impl Record {
    /// Record for a physical text line (newline included if present).
    pub fn line(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            width: None,
        }
    }

    /// Record for a spreadsheet row; cells are joined with [`FIELD_SEPARATOR`].
    pub fn row<S: AsRef<str>>(cells: &[S]) -> Self {
        let mut raw = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                raw.push(FIELD_SEPARATOR);
            }
            raw.push_str(cell.as_ref());
        }
        Self {
            raw,
            width: Some(cells.len()),
        }
    }

    /// Text exactly as read from the source.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Text used for filtering and deduplication: the raw text without one
    /// trailing `\n` or `\r\n`.
    pub fn key(&self) -> &str {
        match self.raw.strip_suffix('\n') {
            Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
            None => &self.raw,
        }
    }

    /// Column count of the originating row, if the record came from a table.
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    /// Split the record back into exactly `columns` fields.
    ///
    /// The last field absorbs any surplus separators; missing trailing fields
    /// come back as empty strings.
    pub fn fields(&self, columns: usize) -> Vec<&str> {
        let columns = columns.max(1);
        let mut fields: Vec<&str> = self.key().splitn(columns, FIELD_SEPARATOR).collect();
        fields.resize(columns, "");
        fields
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How records must be re-serialized on the way out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceShape {
    /// Free text, one record per line.
    #[default]
    Unstructured,
    /// Tabular rows with these column names (header order).
    Structured { columns: Vec<String> },
}

impl SourceShape {
    /// Column names for structured shapes.
    pub fn columns(&self) -> Option<&[String]> {
        match self {
            Self::Unstructured => None,
            Self::Structured { columns } => Some(columns),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured { .. })
    }
}

impl fmt::Display for SourceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstructured => f.write_str("lines"),
            Self::Structured { columns } => write!(f, "rows ({} columns)", columns.len()),
        }
    }
}

/// Everything a reader produces for one input file.
#[derive(Debug, Clone, Default)]
pub struct SourceContents {
    pub records: Vec<Record>,
    pub shape: SourceShape,
}
