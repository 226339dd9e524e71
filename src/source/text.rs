//! Line-oriented text sources with encoding fallback.

use super::RecordFormat;
use crate::error::{ExtractError, Result, ResultExt as _};
use crate::record::{Record, SourceContents, SourceShape};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

/// Text encodings the reader knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1: every byte maps to the code point with the same value, so
    /// decoding never fails.
    Latin1,
}

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Latin1 => Some(bytes.iter().copied().map(char::from).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            other => Err(ExtractError::Config(format!("unknown text encoding '{other}'"))),
        }
    }
}

/// Reads a file as newline-delimited text.
#[derive(Debug, Clone)]
pub struct TextSource {
    encodings: Vec<TextEncoding>,
}

impl TextSource {
    /// Reader that tries `encodings` in order.
    pub fn new(encodings: Vec<TextEncoding>) -> Self {
        Self { encodings }
    }

    /// Decode `bytes` with the first encoding that accepts them.
    pub fn decode(&self, path: &Path, bytes: &[u8]) -> Result<String> {
        for encoding in &self.encodings {
            match encoding.decode(bytes) {
                Some(text) => {
                    log::debug!("Decoded {} as {encoding}", path.display());
                    return Ok(text);
                }
                None => log::warn!(
                    "Failed to read {} with encoding {encoding}, trying the next encoding",
                    path.display()
                ),
            }
        }

        Err(ExtractError::Decoding {
            path: path.to_path_buf(),
            attempted: self.encodings.iter().map(|e| e.name().to_owned()).collect(),
        })
    }
}

impl Default for TextSource {
    fn default() -> Self {
        Self::new(vec![TextEncoding::Utf8, TextEncoding::Latin1])
    }
}

/// Split decoded text into line records.
///
/// `\n`, `\r\n` and a lone `\r` all end a line, and each is kept as a single
/// `\n` in the record's raw text.
pub fn split_lines(text: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut rest = text;
    while let Some(end) = rest.find(['\n', '\r']) {
        let (line, tail) = rest.split_at(end);
        records.push(Record::line(format!("{line}\n")));
        rest = tail
            .strip_prefix("\r\n")
            .or_else(|| tail.get(1..))
            .unwrap_or_default();
    }
    if !rest.is_empty() {
        records.push(Record::line(rest));
    }
    records
}

impl RecordFormat for TextSource {
    fn read(&self, path: &Path) -> Result<SourceContents> {
        let bytes = std::fs::read(path).read_context(path)?;
        let text = self.decode(path, &bytes)?;
        let records = split_lines(&text);
        log::info!("Read {} lines from {}", records.len(), path.display());

        Ok(SourceContents {
            records,
            shape: SourceShape::Unstructured,
        })
    }

    fn serialize(&self, records: &[Record], out: &mut dyn Write) -> io::Result<()> {
        for record in records {
            let raw = record.raw();
            out.write_all(raw.as_bytes())?;
            if !raw.ends_with('\n') {
                out.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}
