//! Pipeline execution engine.
//!
//! Drives a request through the reader, filter, sampler and writer, tracking
//! which stage is active so a failure can be reported against it.

use super::request::ExtractionRequest;
use crate::error::Result;
use crate::filter::KeywordFilter;
use crate::record::SourceShape;
use crate::sampler::{Sampler, SelectionResult};
use crate::source::{RecordFormat as _, SourceFormat};
use crate::writer;
use rand::Rng;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reading,
    Filtering,
    Sampling,
    WritingSelected,
    WritingRemaining,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reading => "reading",
            Self::Filtering => "filtering",
            Self::Sampling => "sampling",
            Self::WritingSelected => "writing selected",
            Self::WritingRemaining => "writing remaining",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Report generated after a successful run.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// Where the selected records were written.
    pub selected_path: PathBuf,

    /// Where the remaining records were written.
    pub remaining_path: PathBuf,

    /// Shape of the input, which also decided the output layout.
    pub shape: SourceShape,

    /// Records read from the input, duplicates included.
    pub records_read: usize,

    /// Records dropped by keyword exclusion.
    pub excluded: usize,

    /// Surviving records dropped as duplicates.
    pub duplicates: usize,

    /// The two partitions that were written.
    pub selection: SelectionResult,

    /// Time taken for the whole run.
    pub duration: Duration,
}

impl ExtractionReport {
    pub fn selected_count(&self) -> usize {
        self.selection.selected.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.selection.remaining.len()
    }

    pub fn unique_count(&self) -> usize {
        self.selection.universe_len()
    }

    /// Create a summary message.
    pub fn summary(&self) -> String {
        format!(
            "Extraction completed: {} {} read, {} excluded, {} duplicates, {} selected, {} remaining, {:.2}s",
            self.records_read,
            if self.shape.is_structured() { "rows" } else { "lines" },
            self.excluded,
            self.duplicates,
            self.selected_count(),
            self.remaining_count(),
            self.duration.as_secs_f64()
        )
    }
}

/// Sequential stage tracker.
#[derive(Debug)]
struct Progress {
    stage: Stage,
}

impl Progress {
    fn new() -> Self {
        Self {
            stage: Stage::Reading,
        }
    }

    fn enter(&mut self, next: Stage) {
        log::debug!("Pipeline stage: {} -> {next}", self.stage);
        self.stage = next;
    }

    /// Run `work` as the current stage, moving to `Failed` if it errors.
    fn attempt<T>(&mut self, work: impl FnOnce() -> Result<T>) -> Result<T> {
        match work() {
            Ok(value) => Ok(value),
            Err(err) => {
                log::error!("Pipeline failed while {}: {err}", self.stage);
                self.stage = Stage::Failed;
                Err(err)
            }
        }
    }
}

/// Execute a request with an entropy-seeded (or request-seeded) sampler.
///
/// # Errors
///
/// Returns the first error hit by any stage. Neither output path is created or
/// modified when an error is returned.
pub fn run(request: &ExtractionRequest) -> Result<ExtractionReport> {
    let mut sampler = Sampler::with_seed(request.seed);
    run_with_sampler(request, &mut sampler)
}

/// Execute a request drawing randomness from `sampler`.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_sampler<R: Rng>(
    request: &ExtractionRequest,
    sampler: &mut Sampler<R>,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let mut progress = Progress::new();

    progress.attempt(|| request.validate())?;

    log::info!("Reading {}", request.input.display());
    let contents = progress.attempt(|| {
        SourceFormat::detect(&request.input)
            .reader(&request.encodings)
            .read(&request.input)
    })?;
    let records_read = contents.records.len();
    let shape = contents.shape;

    progress.enter(Stage::Filtering);
    let filter = KeywordFilter::new(&request.exclude_keywords);
    let kept = filter.apply(contents.records);
    let excluded = records_read - kept.len();
    if !filter.is_empty() {
        log::info!("Excluded {excluded} records matching {:?}", request.exclude_keywords);
    }

    progress.enter(Stage::Sampling);
    let surviving = kept.len();
    let selection = progress.attempt(|| sampler.sample(kept, request.count))?;
    let duplicates = surviving - selection.universe_len();

    progress.enter(Stage::WritingSelected);
    let selected_stage = progress.attempt(|| {
        writer::stage(&request.selected_output, &selection.selected, &shape)
    })?;

    progress.enter(Stage::WritingRemaining);
    let remaining_stage = progress.attempt(|| {
        writer::stage(&request.remaining_output, &selection.remaining, &shape)
    })?;
    let selected = progress.attempt(|| selected_stage.commit())?;
    let selected_path = selected.destination().to_path_buf();
    let remaining_path = progress.attempt(|| match remaining_stage.commit() {
        Ok(remaining) => Ok(remaining.destination().to_path_buf()),
        Err(err) => {
            if let Err(undo) = selected.rollback() {
                log::error!("Could not restore {}: {undo}", selected_path.display());
            }
            Err(err)
        }
    })?;

    progress.enter(Stage::Done);
    let report = ExtractionReport {
        selected_path,
        remaining_path,
        shape,
        records_read,
        excluded,
        duplicates,
        selection,
        duration: start.elapsed(),
    };
    log::info!("{}", report.summary());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use std::collections::HashSet;
    use std::fs;
    use std::num::NonZeroUsize;
    use tempfile::TempDir;

    fn request_in(dir: &TempDir, input: &str, n: usize) -> ExtractionRequest {
        ExtractionRequest::new(
            dir.path().join(input),
            NonZeroUsize::new(n).unwrap(),
            dir.path().join("selected.txt"),
            dir.path().join("remaining.txt"),
        )
    }

    #[test]
    fn test_run_partitions_unique_lines() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("in.txt"), "a,1\nb,2\na,1\nc,3\n").unwrap();

        let request = request_in(&dir, "in.txt", 2);
        let report = run_with_sampler(&request, &mut Sampler::seeded(11)).unwrap();

        assert_eq!(report.records_read, 4);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.excluded, 0);
        assert_eq!(report.selected_count(), 2);
        assert_eq!(report.remaining_count(), 1);

        let selected = fs::read_to_string(&report.selected_path).unwrap();
        let remaining = fs::read_to_string(&report.remaining_path).unwrap();
        let selected: HashSet<&str> = selected.lines().collect();
        let remaining: HashSet<&str> = remaining.lines().collect();
        assert!(selected.is_disjoint(&remaining));
        let union: HashSet<&str> = selected.union(&remaining).copied().collect();
        assert_eq!(union, HashSet::from(["a,1", "b,2", "c,3"]));
    }

    #[test]
    fn test_keywords_applied_before_sampling() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("in.txt"), "apple\nbanana\ngrape\n").unwrap();

        let request = request_in(&dir, "in.txt", 2).with_keywords(vec!["AN".to_owned()]);
        let report = run(&request).unwrap();

        assert_eq!(report.excluded, 1);
        assert_eq!(report.remaining_count(), 0);
        let mut selected: Vec<String> = fs::read_to_string(&report.selected_path)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect();
        selected.sort();
        assert_eq!(selected, vec!["apple", "grape"]);
    }

    #[test]
    fn test_insufficient_records_writes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("in.txt"), "a,1\nb,2\na,1\nc,3\n").unwrap();

        let request = request_in(&dir, "in.txt", 4);
        let err = run(&request).unwrap_err();

        assert!(matches!(
            err,
            ExtractError::InsufficientRecords {
                unique: 3,
                requested: 4
            }
        ));
        assert!(!request.selected_output.exists());
        assert!(!request.remaining_output.exists());
    }

    #[test]
    fn test_failed_second_write_keeps_first_output_untouched() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("in.txt"), "x\ny\nz\n").unwrap();
        fs::write(dir.path().join("selected.txt"), "previous\n").unwrap();

        let mut request = request_in(&dir, "in.txt", 1);
        request.remaining_output = dir.path().join("no-such-dir").join("remaining.txt");

        let err = run(&request).unwrap_err();
        assert!(matches!(err, ExtractError::Write { .. }));
        assert_eq!(
            fs::read_to_string(&request.selected_output).unwrap(),
            "previous\n"
        );
    }

    #[test]
    fn test_directory_as_remaining_output_leaves_selected_alone() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("in.txt"), "x\ny\nz\n").unwrap();
        fs::create_dir(dir.path().join("remaining.txt")).unwrap();

        let request = request_in(&dir, "in.txt", 1);
        let err = run(&request).unwrap_err();

        assert!(matches!(err, ExtractError::Write { .. }));
        assert!(!request.selected_output.exists());
        assert!(request.remaining_output.is_dir());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = TempDir::new().unwrap();
        let request = request_in(&dir, "absent.txt", 1);
        assert!(matches!(run(&request), Err(ExtractError::Io { .. })));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::WritingSelected.to_string(), "writing selected");
        assert_eq!(Stage::Failed.to_string(), "failed");
    }
}
