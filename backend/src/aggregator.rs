//! Merge per-file verse records into the final collection.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::types::{Testament, VerseKey, VerseRecord};

/// Observational counts over a verse collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub total: usize,
    /// Verse counts per source code, in first-seen order
    pub per_source: IndexMap<String, usize>,
    pub old_testament: usize,
    pub new_testament: usize,
    /// Records dropped as duplicates of an earlier (book, chapter, verse, source)
    pub duplicates_removed: usize,
}

impl DatasetSummary {
    pub fn from_verses(verses: &[VerseRecord]) -> Self {
        let mut summary = DatasetSummary {
            total: verses.len(),
            ..Default::default()
        };
        for v in verses {
            *summary.per_source.entry(v.source.clone()).or_insert(0) += 1;
            match v.testament() {
                Testament::Old => summary.old_testament += 1,
                Testament::New => summary.new_testament += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone)]
pub struct AggregatedVerses {
    pub verses: Vec<VerseRecord>,
    pub summary: DatasetSummary,
}

/// Sort by (book, chapter, verse) and drop duplicate (book, chapter, verse, source) keys.
///
/// The sort is stable, so records at the same position keep their input
/// order across sources, and the first record of a duplicated key is kept.
pub fn aggregate_verses(mut verses: Vec<VerseRecord>) -> AggregatedVerses {
    let input_len = verses.len();

    verses.sort_by_key(|v| v.position());

    let mut seen: HashSet<VerseKey> = HashSet::new();
    verses.retain(|v| seen.insert(v.key()));

    let mut summary = DatasetSummary::from_verses(&verses);
    summary.duplicates_removed = input_len - verses.len();

    AggregatedVerses { verses, summary }
}

/// Group records by their source code, in first-seen order, keeping record order within each group.
pub fn group_by_source(verses: &[VerseRecord]) -> IndexMap<&str, Vec<&VerseRecord>> {
    let mut groups: IndexMap<&str, Vec<&VerseRecord>> = IndexMap::new();
    for v in verses {
        groups.entry(v.source.as_str()).or_default().push(v);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;

    fn record(book_number: u32, chapter: u32, verse: u32, source: &str, text: &str) -> VerseRecord {
        VerseRecord {
            book_number,
            chapter,
            verse,
            language: if book_number >= 40 { Language::Greek } else { Language::Hebrew },
            original_text: text.to_string(),
            transliteration: None,
            source: source.to_string(),
        }
    }

    fn keys(verses: &[VerseRecord]) -> Vec<(u32, u32, u32, &str)> {
        verses.iter().map(|v| (v.book_number, v.chapter, v.verse, v.source.as_str())).collect()
    }

    #[test]
    fn test_sort_is_stable_across_sources() {
        let input = vec![
            record(1, 1, 2, "A", "a2"),
            record(1, 1, 1, "A", "a1"),
            record(1, 1, 2, "B", "b2"),
            record(1, 1, 1, "B", "b1"),
        ];
        let result = aggregate_verses(input);
        assert_eq!(keys(&result.verses), vec![(1, 1, 1, "A"), (1, 1, 1, "B"), (1, 1, 2, "A"), (1, 1, 2, "B")]);
    }

    #[test]
    fn test_sort_is_numeric_not_lexicographic() {
        let input = vec![
            record(1, 10, 1, "A", "x"),
            record(1, 2, 10, "A", "x"),
            record(1, 2, 9, "A", "x"),
            record(40, 1, 1, "A", "x"),
            record(9, 1, 1, "A", "x"),
        ];
        let result = aggregate_verses(input);
        let positions: Vec<_> = result.verses.iter().map(|v| v.position()).collect();
        assert_eq!(positions, vec![(1, 2, 9), (1, 2, 10), (1, 10, 1), (9, 1, 1), (40, 1, 1)]);
    }

    #[test]
    fn test_first_seen_duplicate_wins() {
        let input = vec![
            record(1, 1, 1, "A", "first"),
            record(1, 1, 1, "B", "other source"),
            record(1, 1, 1, "A", "second"),
        ];
        let result = aggregate_verses(input);
        assert_eq!(result.verses.len(), 2);
        assert_eq!(result.verses[0].original_text, "first");
        assert_eq!(result.verses[1].source, "B");
        assert_eq!(result.summary.duplicates_removed, 1);
    }

    #[test]
    fn test_output_has_one_record_per_key() {
        let mut input = Vec::new();
        for i in 0..3 {
            for source in ["A", "B"] {
                for verse in 1..=4 {
                    input.push(record(1, 1, verse, source, &format!("{} {}", source, i)));
                }
            }
        }
        let result = aggregate_verses(input);
        assert_eq!(result.verses.len(), 8);
        let unique: HashSet<VerseKey> = result.verses.iter().map(|v| v.key()).collect();
        assert_eq!(unique.len(), 8);
        assert!(result.verses.iter().all(|v| v.original_text.ends_with('0')));
        assert!(result.verses.windows(2).all(|w| w[0].position() <= w[1].position()));
    }

    #[test]
    fn test_summary_counts() {
        let input = vec![
            record(1, 1, 1, "WLC", "x"),
            record(39, 1, 1, "WLC", "x"),
            record(40, 1, 1, "SBLGNT", "x"),
        ];
        let result = aggregate_verses(input);
        assert_eq!(result.summary.total, 3);
        assert_eq!(result.summary.old_testament, 2);
        assert_eq!(result.summary.new_testament, 1);
        assert_eq!(result.summary.per_source.get("WLC"), Some(&2));
        assert_eq!(result.summary.per_source.get("SBLGNT"), Some(&1));
    }

    #[test]
    fn test_group_by_source() {
        let verses = vec![
            record(1, 1, 1, "WLC", "a"),
            record(40, 1, 1, "SBLGNT", "b"),
            record(1, 1, 2, "WLC", "c"),
        ];
        let groups = group_by_source(&verses);
        let codes: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(codes, vec!["WLC", "SBLGNT"]);
        assert_eq!(groups["WLC"].len(), 2);
        assert_eq!(groups["WLC"][1].original_text, "c");
    }

    #[test]
    fn test_empty_input() {
        let result = aggregate_verses(Vec::new());
        assert!(result.verses.is_empty());
        assert_eq!(result.summary, DatasetSummary::default());
    }
}
