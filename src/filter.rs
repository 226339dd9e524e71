//! Keyword exclusion.
//!
//! A record is dropped when its key contains any exclusion keyword, compared
//! case-insensitively as a plain substring. Surviving records keep their input
//! order.

use crate::record::Record;

/// Pre-normalized set of exclusion keywords.
#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether `record` contains any of the keywords.
    pub fn excludes(&self, record: &Record) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        let text = record.key().to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    /// Records containing none of the keywords, in input order.
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        if self.keywords.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| !self.excludes(r)).collect()
    }
}

/// Convenience wrapper around [`KeywordFilter::apply`].
pub fn exclude<S: AsRef<str>>(records: Vec<Record>, keywords: &[S]) -> Vec<Record> {
    KeywordFilter::new(keywords).apply(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lines(raw: &[&str]) -> Vec<Record> {
        raw.iter().map(|s| Record::line(*s)).collect()
    }

    #[test]
    fn test_excludes_substring_case_insensitive() {
        let kept = exclude(lines(&["apple\n", "BANANA\n", "grape\n"]), &["an"]);
        let keys: Vec<&str> = kept.iter().map(Record::key).collect();
        assert_eq!(keys, vec!["apple", "grape"]);
    }

    #[test]
    fn test_no_keywords_passes_everything() {
        let records = lines(&["a\n", "b\n"]);
        let no_keywords: [&str; 0] = [];
        assert_eq!(exclude(records.clone(), &no_keywords), records);
    }

    #[test]
    fn test_empty_input() {
        assert!(exclude(Vec::new(), &["x"]).is_empty());
    }

    #[test]
    fn test_newline_is_not_matched() {
        // A keyword ending in a newline must not match via the line terminator
        let kept = exclude(lines(&["end\n"]), &["d\n"]);
        assert_eq!(kept.len(), 1);
    }

    proptest! {
        #[test]
        fn test_filter_is_idempotent(
            raw in proptest::collection::vec("[a-dA-D ]{0,8}", 0..40),
            keywords in proptest::collection::vec("[a-d]{1,2}", 0..4),
        ) {
            let records: Vec<Record> = raw.iter().map(|s| Record::line(format!("{s}\n"))).collect();
            let once = exclude(records, &keywords);
            let twice = exclude(once.clone(), &keywords);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_adding_keyword_never_increases_survivors(
            raw in proptest::collection::vec("[a-dA-D ]{0,8}", 0..40),
            keywords in proptest::collection::vec("[a-d]{1,2}", 0..4),
            extra in "[a-d]{1,2}",
        ) {
            let records: Vec<Record> = raw.iter().map(|s| Record::line(format!("{s}\n"))).collect();
            let before = exclude(records.clone(), &keywords).len();
            let mut more = keywords.clone();
            more.push(extra);
            let after = exclude(records, &more).len();
            prop_assert!(after <= before);
        }
    }
}
