//! End-to-end extraction: read, filter, deduplicate, sample, write.
//!
//! A run is described by an [`ExtractionRequest`] and executed by [`run`]:
//!
//! ```text
//! Reading ─> Filtering ─> Sampling ─> Writing(selected) ─> Writing(remaining) ─> Done
//!    │           │            │               │                    │
//!    └───────────┴────────────┴───────────────┴────────────────────┴──> Failed
//! ```
//!
//! Both outputs are staged to temporary files and only committed once both
//! were serialized, so any failure leaves the destinations exactly as they
//! were.
//!
//! # Example
//!
//! ```no_run
//! use usamplex::pipeline::{ExtractionRequest, run};
//! use std::num::NonZeroUsize;
//!
//! let request = ExtractionRequest::new(
//!     "wordlist.txt",
//!     NonZeroUsize::new(100).unwrap(),
//!     "picked.txt",
//!     "rest.txt",
//! )
//! .with_keywords(vec!["test".to_owned()]);
//!
//! let report = run(&request)?;
//! println!("{}", report.summary());
//! # Ok::<(), usamplex::error::ExtractError>(())
//! ```

pub mod executor;
pub mod request;

pub use executor::{ExtractionReport, Stage, run, run_with_sampler};
pub use request::ExtractionRequest;
