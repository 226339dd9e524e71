//! Parameters of a single extraction run.

use crate::config::FileConfig;
use crate::error::{ExtractError, Result};
use crate::source::TextEncoding;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Everything the pipeline needs to know for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// File to sample from; its extension decides text vs. spreadsheet.
    pub input: PathBuf,

    /// Number of unique records to select.
    pub count: NonZeroUsize,

    /// Destination for the selected records.
    pub selected_output: PathBuf,

    /// Destination for every unique record that was not selected.
    pub remaining_output: PathBuf,

    /// Records containing any of these (case-insensitive) are dropped first.
    pub exclude_keywords: Vec<String>,

    /// Text encodings to try in order; empty uses utf-8 then latin-1.
    pub encodings: Vec<TextEncoding>,

    /// Fixed RNG seed, entropy when `None`.
    pub seed: Option<u64>,
}

impl ExtractionRequest {
    pub fn new(
        input: impl Into<PathBuf>,
        count: NonZeroUsize,
        selected_output: impl Into<PathBuf>,
        remaining_output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            count,
            selected_output: selected_output.into(),
            remaining_output: remaining_output.into(),
            exclude_keywords: Vec::new(),
            encodings: Vec::new(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.exclude_keywords = keywords;
        self
    }

    #[must_use]
    pub fn with_encodings(mut self, encodings: Vec<TextEncoding>) -> Self {
        self.encodings = encodings;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Fold file-level defaults into the request. Keywords are appended;
    /// encodings and seed only fill in what the request left unset.
    ///
    /// # Errors
    ///
    /// [`ExtractError::Config`] if the file names an unknown encoding.
    pub fn merge_file_config(mut self, config: &FileConfig) -> Result<Self> {
        self.exclude_keywords
            .extend(config.exclude_keywords.iter().cloned());
        if self.encodings.is_empty() {
            self.encodings = config.text_encodings()?;
        }
        if self.seed.is_none() {
            self.seed = config.seed;
        }
        Ok(self)
    }

    /// Reject requests that could never produce two distinct outputs.
    ///
    /// # Errors
    ///
    /// [`ExtractError::Config`] if both outputs resolve to the same file.
    pub fn validate(&self) -> Result<()> {
        if resolve_output(&self.selected_output) == resolve_output(&self.remaining_output) {
            return Err(ExtractError::Config(format!(
                "selected and remaining outputs are the same file: {}",
                self.selected_output.display()
            )));
        }
        Ok(())
    }
}

/// Best-effort absolute form of an output path that may not exist yet.
///
/// An existing file is canonicalized as a whole; otherwise only its parent
/// directory is, and the file name is joined back on. Paths that cannot be
/// resolved are compared as given.
fn resolve_output(path: &Path) -> PathBuf {
    if let Ok(existing) = path.canonicalize() {
        return existing;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ExtractionRequest {
        ExtractionRequest::new("in.txt", NonZeroUsize::new(2).unwrap(), "a.txt", "b.txt")
    }

    #[test]
    fn test_same_outputs_rejected() {
        let mut req = request();
        req.remaining_output = req.selected_output.clone();
        assert!(matches!(req.validate(), Err(ExtractError::Config(_))));
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_outputs_naming_same_file_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let mut req = request();
        req.selected_output = dir.path().join("out.txt");
        req.remaining_output = dir.path().join("sub").join("..").join("out.txt");
        assert!(matches!(req.validate(), Err(ExtractError::Config(_))));

        req.remaining_output = dir.path().join("sub").join("out.txt");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_merge_file_config_prefers_request() {
        let config = FileConfig {
            exclude_keywords: vec!["spam".to_owned()],
            encodings: vec!["latin-1".to_owned()],
            seed: Some(9),
        };

        let merged = request()
            .with_keywords(vec!["ham".to_owned()])
            .with_seed(Some(1))
            .merge_file_config(&config)
            .unwrap();

        assert_eq!(merged.exclude_keywords, vec!["ham".to_owned(), "spam".to_owned()]);
        assert_eq!(merged.encodings, vec![TextEncoding::Latin1]);
        assert_eq!(merged.seed, Some(1));
    }
}
