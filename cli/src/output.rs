use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use openbibles_backend::{logger, DatasetSummary, VerseRecord, EXPECTED_FULL_CORPUS_VERSES, INCOMPLETE_CORPUS_THRESHOLD};

use crate::pipeline::PipelineStats;

/// Write the verse collection as a JSON array, creating the parent directory if needed.
pub fn write_verses_json(path: &Path, verses: &[VerseRecord], pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
    }

    let json = if pretty {
        serde_json::to_string_pretty(verses)?
    } else {
        serde_json::to_string(verses)?
    };

    fs::write(path, json).with_context(|| format!("Failed to write output: {}", path.display()))?;
    Ok(())
}

pub fn read_verses_json(path: &Path) -> Result<Vec<VerseRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read verses file: {}", path.display()))?;
    let verses: Vec<VerseRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse verses file: {}", path.display()))?;
    Ok(verses)
}

/// True when a non-empty collection is noticeably short of the full corpus.
pub fn is_incomplete(total: usize) -> bool {
    total > 0 && total < INCOMPLETE_CORPUS_THRESHOLD
}

pub fn log_summary(summary: &DatasetSummary) {
    logger::info(&format!("Total verses: {}", summary.total));
    for (code, count) in summary.per_source.iter() {
        logger::info(&format!("  {}: {} verses", code, count));
    }
    logger::info(&format!("  Old Testament: {}", summary.old_testament));
    logger::info(&format!("  New Testament: {}", summary.new_testament));
    if summary.duplicates_removed > 0 {
        logger::info(&format!("  Duplicates removed: {}", summary.duplicates_removed));
    }

    if is_incomplete(summary.total) {
        logger::warn(&format!(
            "Only {} verses found, expected about {}. Some source files may be missing.",
            summary.total, EXPECTED_FULL_CORPUS_VERSES
        ));
    }
}

pub fn log_stats(stats: &PipelineStats) {
    logger::info(&format!(
        "Files: {} parsed, {} unrecognized, {} failed",
        stats.files_processed, stats.files_unrecognized, stats.files_failed
    ));
    logger::info(&format!(
        "Verses: {} extracted, {} empty, {} unresolved references",
        stats.verses_extracted, stats.verses_skipped, stats.unresolved_refs
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use openbibles_backend::Language;

    #[test]
    fn test_is_incomplete() {
        assert!(!is_incomplete(0));
        assert!(is_incomplete(1));
        assert!(is_incomplete(30_999));
        assert!(!is_incomplete(31_000));
        assert!(!is_incomplete(31_102));
    }

    #[test]
    fn test_write_creates_parent_dir() {
        let dir = std::env::temp_dir().join(format!("openbibles_output_{}", std::process::id()));
        let path = dir.join("nested").join("original_verses.json");

        let verses = vec![VerseRecord {
            book_number: 43,
            chapter: 1,
            verse: 1,
            language: Language::Greek,
            original_text: "Ἐν ἀρχῇ ἦν ὁ λόγος".to_string(),
            transliteration: None,
            source: "SBLGNT".to_string(),
        }];

        write_verses_json(&path, &verses, true).unwrap();
        assert_eq!(read_verses_json(&path).unwrap(), verses);

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"book_number\": 43"));
        assert!(json.contains("\"language\": \"greek\""));
        assert!(json.contains("\"transliteration\": null"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
