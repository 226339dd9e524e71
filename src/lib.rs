//! # usamplex - Unique Random Line/Row Extraction
//!
//! usamplex picks `N` unique records at random from a text file or a
//! spreadsheet and splits the source into two disjoint outputs: the selected
//! sample and everything that was not selected.
//!
//! ## Quick Start
//!
//! ```no_run
//! use usamplex::pipeline::{ExtractionRequest, run};
//! use std::num::NonZeroUsize;
//!
//! let request = ExtractionRequest::new(
//!     "emails.txt",
//!     NonZeroUsize::new(500).unwrap(),
//!     "sample.txt",
//!     "rest.txt",
//! )
//! .with_keywords(vec!["example.com".to_owned()]);
//!
//! let report = run(&request)?;
//! println!("{} selected, {} remaining", report.selected_count(), report.remaining_count());
//! # Ok::<(), usamplex::error::ExtractError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`source`]: text and spreadsheet readers behind the [`source::RecordFormat`] trait
//! - [`filter`]: case-insensitive keyword exclusion
//! - [`sampler`]: deduplication and uniform sampling without replacement
//! - [`writer`]: staged, all-or-nothing output persistence
//! - [`pipeline`]: the orchestrator tying the stages together
//! - [`record`]: the shared data model
//! - [`error`]: error taxonomy and exit codes
//!
//! ## Key Concepts
//!
//! ### Records and Keys
//!
//! A text record keeps its raw line, newline included. Deduplication and
//! filtering compare the record's *key*, which drops that trailing newline, so
//! `"a\n"` and a final `"a"` without newline count as the same record.
//!
//! ### Source Shape
//!
//! Spreadsheet rows are flattened into comma-joined text for filtering and
//! deduplication. The reader remembers the column names in a
//! [`record::SourceShape`], and the writer uses it to split records back into
//! the same number of CSV fields.
//!
//! ### All-or-Nothing Output
//!
//! Nothing is written unless the whole run succeeds. Asking for more records
//! than there are unique ones fails with
//! [`error::ExtractError::InsufficientRecords`] and leaves both destinations
//! untouched.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod sampler;
pub mod source;
pub mod writer;
