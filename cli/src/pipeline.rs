//! Pipeline driver: sources → files → dialect parser → aggregation.
//!
//! Strictly sequential. A failing file is logged and counted, never fatal.
//! Only a missing sources root or book table stops the run.

use std::path::{Path, PathBuf};

use anyhow::Result;
use indexmap::IndexMap;
use thiserror::Error;

use openbibles_backend::{
    aggregate_verses, logger, parse_document, AggregatedVerses, BookIndex, BookIndexError, DatasetSummary,
    DocumentFormat, ParseContext, ParseOutcome, SourceConfig, VerseRecord,
};

use crate::config::PipelineConfig;
use crate::encoding::read_source_file;
use crate::sources::discover_source_files;

#[derive(Debug, Error)]
pub enum FatalError {
    #[error("Sources directory not found: {0}")]
    SourcesDirMissing(PathBuf),

    #[error("Book map not found: {0}")]
    BookMapMissing(PathBuf),

    #[error("Failed to load book map {path}: {source}")]
    BookMap {
        path: PathBuf,
        #[source]
        source: BookIndexError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub files: usize,
    pub verses: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub files_unrecognized: usize,
    pub verses_extracted: usize,
    /// Verses with no text after normalization
    pub verses_skipped: usize,
    /// Unknown book ids and malformed references
    pub unresolved_refs: usize,
    pub per_source: IndexMap<String, SourceStats>,
}

impl PipelineStats {
    fn add_outcome(&mut self, source_code: &str, outcome: &ParseOutcome) {
        self.files_processed += 1;
        self.verses_extracted += outcome.verses.len();
        self.verses_skipped += outcome.empty_verses;
        self.unresolved_refs += outcome.unresolved();

        let s = self.per_source.entry(source_code.to_string()).or_default();
        s.files += 1;
        s.verses += outcome.verses.len();
    }
}

#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub verses: Vec<VerseRecord>,
    pub summary: DatasetSummary,
    pub stats: PipelineStats,
}

/// Read and parse one file.
///
/// Errors are file-level (unreadable file); record-level problems are in the outcome.
pub fn process_file(path: &Path, ctx: &ParseContext) -> Result<(DocumentFormat, ParseOutcome)> {
    let content = read_source_file(path)?;
    Ok(parse_document(&content, ctx))
}

/// Imports every source file of one SourceConfig directory.
pub struct SourceImporter<'a> {
    source: &'a SourceConfig,
    source_dir: PathBuf,
}

impl<'a> SourceImporter<'a> {
    pub fn new(source: &'a SourceConfig, sources_dir: &Path) -> Self {
        SourceImporter {
            source,
            source_dir: sources_dir.join(&source.code),
        }
    }

    pub fn import(&self, book_index: &BookIndex, stats: &mut PipelineStats) -> Vec<VerseRecord> {
        let code = &self.source.code;

        if !self.source_dir.is_dir() {
            logger::warn(&format!("Source directory not found: {} (skipping)", code));
            return Vec::new();
        }

        logger::info(&format!("Processing source: {} ({})", code, self.source.display_name));
        stats.per_source.entry(code.clone()).or_default();

        let files = match discover_source_files(&self.source_dir) {
            Ok(files) => files,
            Err(e) => {
                logger::error(&format!("  Failed to list files of {}: {:#}", code, e));
                return Vec::new();
            }
        };

        if files.is_empty() {
            logger::info(&format!("  No XML files found in {}", code));
            return Vec::new();
        }

        let verses = self.import_files(&files, book_index, stats);

        if let Some(s) = stats.per_source.get(code) {
            logger::info(&format!("  Total: {} verses from {} files", s.verses, s.files));
        }

        verses
    }

    /// Parse the given files in order. A file that cannot be read is logged,
    /// counted as failed and skipped.
    pub fn import_files(&self, files: &[PathBuf], book_index: &BookIndex, stats: &mut PipelineStats) -> Vec<VerseRecord> {
        let code = &self.source.code;
        let ctx = ParseContext::new(book_index, self.source);
        let mut verses = Vec::new();

        for path in files {
            let file_name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();

            match process_file(path, &ctx) {
                Ok((DocumentFormat::Unrecognized, _)) => {
                    logger::warn(&format!("  Unknown format: {}", file_name));
                    stats.files_unrecognized += 1;
                }
                Ok((format, outcome)) => {
                    logger::info(&format!(
                        "    {} ({}): {} verses, {} skipped",
                        file_name, format, outcome.verses.len(), outcome.skipped()
                    ));
                    stats.add_outcome(code, &outcome);
                    verses.extend(outcome.verses);
                }
                Err(e) => {
                    logger::error(&format!("  Error parsing {}: {:#}", file_name, e));
                    stats.files_failed += 1;
                }
            }
        }

        verses
    }
}

/// Parse every configured source in order and aggregate the result.
pub fn process_sources(sources_dir: &Path, sources: &[SourceConfig], book_index: &BookIndex) -> PipelineRun {
    let mut stats = PipelineStats::default();
    let mut all_verses = Vec::new();

    for source in sources {
        let importer = SourceImporter::new(source, sources_dir);
        all_verses.extend(importer.import(book_index, &mut stats));
    }

    let AggregatedVerses { verses, summary } = aggregate_verses(all_verses);

    PipelineRun { verses, summary, stats }
}

/// Check the required inputs and load the book table.
pub fn load_inputs(config: &PipelineConfig) -> Result<BookIndex, FatalError> {
    if !config.sources_dir.is_dir() {
        return Err(FatalError::SourcesDirMissing(config.sources_dir.clone()));
    }
    if !config.book_map_path.is_file() {
        return Err(FatalError::BookMapMissing(config.book_map_path.clone()));
    }

    BookIndex::load_json(&config.book_map_path).map_err(|source| FatalError::BookMap {
        path: config.book_map_path.clone(),
        source,
    })
}

pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineRun> {
    logger::info("Loading book map...");
    let book_index = load_inputs(config)?;
    logger::info(&format!("  Loaded {} books", book_index.len()));

    Ok(process_sources(&config.sources_dir, &config.sources, &book_index))
}
