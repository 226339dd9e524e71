//! Run configuration loaded from a JSON file.
//!
//! Command-line flags always win. A config file only supplies defaults that
//! would be tedious to repeat on every invocation:
//!
//! ```json
//! {
//!   "exclude_keywords": ["test", "example.com"],
//!   "encodings": ["utf-8", "latin-1"],
//!   "seed": 1234
//! }
//! ```

use crate::error::{ExtractError, Result, ResultExt as _};
use crate::source::TextEncoding;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional defaults for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Keywords excluded in addition to any given on the command line.
    pub exclude_keywords: Vec<String>,
    /// Text encodings to try, in order; empty means the built-in fallback list.
    pub encodings: Vec<String>,
    /// Fixed RNG seed for reproducible selections.
    pub seed: Option<u64>,
}

impl FileConfig {
    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// [`ExtractError::Io`] if the file cannot be read, [`ExtractError::Config`]
    /// if it is not valid JSON for this structure.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).read_context(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            ExtractError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Parsed form of [`FileConfig::encodings`].
    pub fn text_encodings(&self) -> Result<Vec<TextEncoding>> {
        parse_encodings(&self.encodings)
    }
}

/// Parse encoding names such as `utf-8` or `latin-1`.
pub fn parse_encodings<S: AsRef<str>>(names: &[S]) -> Result<Vec<TextEncoding>> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"exclude_keywords": ["spam"], "seed": 5}"#)
            .unwrap();
        file.flush().unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.exclude_keywords, vec!["spam".to_owned()]);
        assert_eq!(config.seed, Some(5));
        assert!(config.encodings.is_empty());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        file.flush().unwrap();

        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn test_parse_encodings() {
        let parsed = parse_encodings(&["latin1", "UTF-8"]).unwrap();
        assert_eq!(parsed, vec![TextEncoding::Latin1, TextEncoding::Utf8]);
        assert!(parse_encodings(&["klingon"]).is_err());
    }
}
