//! Source readers and their matching serializers.
//!
//! Input files come in two families, each handled by one implementation of
//! [`RecordFormat`]:
//!
//! - [`TextSource`]: any file whose extension is not a spreadsheet one. Decoded
//!   with a fallback list of encodings and split into lines.
//! - [`TabularSource`]: `.xls`, `.xlsx`, `.xlsm`, `.xlsb` and `.ods` workbooks,
//!   read with `calamine`. Rows are flattened into comma-joined records and
//!   written back out as CSV.
//!
//! The family is picked once at the boundary by [`SourceFormat::detect`], which
//! only looks at the path's extension. On the way out the family is picked by
//! the [`SourceShape`] the reader produced, see [`for_shape`].
//!
//! ```no_run
//! use usamplex::source::{RecordFormat as _, SourceFormat};
//! use std::path::Path;
//!
//! let path = Path::new("inventory.xlsx");
//! let contents = SourceFormat::detect(path).reader(&[]).read(path)?;
//! println!("{} records shaped as {}", contents.records.len(), contents.shape);
//! # Ok::<(), usamplex::error::ExtractError>(())
//! ```

pub mod tabular;
pub mod text;

pub use tabular::TabularSource;
pub use text::{TextEncoding, TextSource};

use crate::error::Result;
use crate::record::{Record, SourceContents, SourceShape};
use std::io::{self, Write};
use std::path::Path;

/// Extensions routed to the spreadsheet reader (compared lowercase).
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// Read/write capability shared by both source families.
pub trait RecordFormat {
    /// Load `path` into records plus the shape needed to write them back.
    fn read(&self, path: &Path) -> Result<SourceContents>;

    /// Serialize `records` into `out` in this family's on-disk layout.
    fn serialize(&self, records: &[Record], out: &mut dyn Write) -> io::Result<()>;
}

/// Input family inferred from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Text,
    Spreadsheet,
}

impl SourceFormat {
    pub fn detect(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
            Self::Spreadsheet
        } else {
            Self::Text
        }
    }

    /// Reader for this family. `encodings` only matters for text; an empty
    /// slice selects [`TextSource`]'s default fallback list.
    pub fn reader(self, encodings: &[TextEncoding]) -> Box<dyn RecordFormat> {
        match self {
            Self::Text if encodings.is_empty() => Box::new(TextSource::default()),
            Self::Text => Box::new(TextSource::new(encodings.to_vec())),
            Self::Spreadsheet => Box::new(TabularSource::default()),
        }
    }
}

/// Serializer matching the shape a reader produced.
pub fn for_shape(shape: &SourceShape) -> Box<dyn RecordFormat> {
    match shape {
        SourceShape::Unstructured => Box::new(TextSource::default()),
        SourceShape::Structured { columns } => Box::new(TabularSource::with_columns(columns.clone())),
    }
}
