//! Centralized error handling for the extraction pipeline.
//!
//! Every failure the pipeline can hit is one variant of [`ExtractError`]. All of
//! them are terminal for the current run: nothing is retried, and no output file
//! is created or touched once an error has been raised.
//!
//! ## Error Categories
//!
//! | Variant | Raised by | Exit code |
//! |---------|-----------|-----------|
//! | [`ExtractError::Io`] | reader, input missing or unreadable | 2 |
//! | [`ExtractError::Decoding`] | text reader, no encoding succeeded | 3 |
//! | [`ExtractError::UnsupportedFormat`] | spreadsheet reader | 4 |
//! | [`ExtractError::InsufficientRecords`] | sampler | 5 |
//! | [`ExtractError::Write`] | writer | 6 |
//! | [`ExtractError::Config`] | request/config validation | 64 |
//!
//! ## Attaching Paths
//!
//! The [`ResultExt`] trait turns a bare `std::io::Error` into the right variant
//! while recording which file was involved:
//!
//! ```no_run
//! use usamplex::error::{Result, ResultExt as _};
//! use std::path::Path;
//!
//! fn load(path: &Path) -> Result<Vec<u8>> {
//!     std::fs::read(path).read_context(path)
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for extraction runs.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input path is missing or cannot be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// None of the attempted text encodings could decode the input.
    #[error(
        "failed to decode {} with any of the attempted encodings ({})",
        .path.display(),
        .attempted.join(", ")
    )]
    Decoding {
        path: PathBuf,
        attempted: Vec<String>,
    },

    /// The file was declared as a spreadsheet but could not be parsed as one.
    #[error("unsupported spreadsheet {}: {reason}", .path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Fewer unique records survived filtering than were requested.
    #[error("not enough unique records after filtering: found {unique}, requested {requested}")]
    InsufficientRecords { unique: usize, requested: usize },

    /// An output file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The request itself is invalid (bad encoding name, clashing paths, ...).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ExtractError {
    /// Process exit code the command-line front end reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Io { .. } => 2,
            Self::Decoding { .. } => 3,
            Self::UnsupportedFormat { .. } => 4,
            Self::InsufficientRecords { .. } => 5,
            Self::Write { .. } => 6,
            Self::Config(_) => 64,
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Extension trait that tags I/O failures with the file they concern.
pub trait ResultExt<T> {
    /// Map an I/O error to [`ExtractError::Io`] for `path`.
    fn read_context(self, path: &Path) -> Result<T>;

    /// Map an I/O error to [`ExtractError::Write`] for `path`.
    fn write_context(self, path: &Path) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, io::Error> {
    fn read_context(self, path: &Path) -> Result<T> {
        self.map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_context(self, path: &Path) -> Result<T> {
        self.map_err(|source| ExtractError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtractError::InsufficientRecords {
            unique: 3,
            requested: 4,
        };
        assert_eq!(
            err.to_string(),
            "not enough unique records after filtering: found 3, requested 4"
        );
    }

    #[test]
    fn test_decoding_lists_attempts() {
        let err = ExtractError::Decoding {
            path: PathBuf::from("data.txt"),
            attempted: vec!["utf-8".to_owned(), "latin-1".to_owned()],
        };
        let msg = err.to_string();
        assert!(msg.contains("data.txt"));
        assert!(msg.contains("utf-8, latin-1"));
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            ExtractError::Io {
                path: PathBuf::new(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
            ExtractError::Decoding {
                path: PathBuf::new(),
                attempted: Vec::new(),
            },
            ExtractError::UnsupportedFormat {
                path: PathBuf::new(),
                reason: String::new(),
            },
            ExtractError::InsufficientRecords {
                unique: 0,
                requested: 1,
            },
            ExtractError::Write {
                path: PathBuf::new(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
            ExtractError::Config(String::new()),
        ];
        let mut codes: Vec<u8> = errors.iter().map(ExtractError::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "file.txt"));

        let err = result.read_context(Path::new("missing.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }
}
