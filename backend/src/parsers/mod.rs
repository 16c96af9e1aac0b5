//! One parser per markup dialect, behind a common `VerseParser` trait.

pub mod osis_inline;
pub mod osis_milestone;
pub mod usfx;

use crate::book_index::BookIndex;
use crate::format_detector::{detect_format, DocumentFormat};
use crate::helpers::normalize_verse_text;
use crate::logger;
use crate::reference::{resolve_reference, ReferenceError, ResolvedRef};
use crate::types::{ParseOutcome, SourceConfig, VerseRecord};

pub use osis_inline::OsisInlineParser;
pub use osis_milestone::OsisMilestoneParser;
pub use usfx::UsfxParser;

/// Read-only context threaded through every parse call.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub book_index: &'a BookIndex,
    pub source: &'a SourceConfig,
}

impl<'a> ParseContext<'a> {
    pub fn new(book_index: &'a BookIndex, source: &'a SourceConfig) -> Self {
        ParseContext { book_index, source }
    }

    /// Resolve a reference, counting and logging a failure in `outcome`.
    pub(crate) fn resolve(&self, reference: &str, outcome: &mut ParseOutcome) -> Option<ResolvedRef> {
        match resolve_reference(reference, self.book_index) {
            Ok(r) => Some(r),
            Err(e) => {
                record_reference_error(&e, outcome);
                None
            }
        }
    }

    /// Normalize the raw verse content and push a record, unless the text is empty.
    pub(crate) fn emit(&self, verse_ref: ResolvedRef, raw_content: &str, outcome: &mut ParseOutcome) {
        let text = normalize_verse_text(raw_content);
        if text.is_empty() {
            logger::debug(&format!(
                "{}: empty text for book {} {}:{}, skipping",
                self.source.code, verse_ref.book_number, verse_ref.chapter, verse_ref.verse
            ));
            outcome.empty_verses += 1;
            return;
        }

        outcome.verses.push(VerseRecord {
            book_number: verse_ref.book_number,
            chapter: verse_ref.chapter,
            verse: verse_ref.verse,
            language: verse_ref.language,
            original_text: text,
            transliteration: None,
            source: self.source.code.clone(),
        });
    }
}

pub(crate) fn record_reference_error(e: &ReferenceError, outcome: &mut ParseOutcome) {
    logger::warn(&format!("  {}", e));
    match e {
        ReferenceError::Malformed { .. } => outcome.malformed_refs += 1,
        ReferenceError::UnknownBook(_) => outcome.unknown_books += 1,
    }
}

pub trait VerseParser {
    fn parse(&self, content: &str, ctx: &ParseContext) -> ParseOutcome;
}

/// The parser for a detected format, None for unrecognized documents.
pub fn parser_for(format: DocumentFormat) -> Option<&'static dyn VerseParser> {
    match format {
        DocumentFormat::Usfx => Some(&UsfxParser),
        DocumentFormat::OsisMilestone => Some(&OsisMilestoneParser),
        DocumentFormat::OsisInline => Some(&OsisInlineParser),
        DocumentFormat::Unrecognized => None,
    }
}

/// Detect the dialect of a document and parse it with the matching parser.
///
/// Unrecognized documents give an empty outcome.
pub fn parse_document(content: &str, ctx: &ParseContext) -> (DocumentFormat, ParseOutcome) {
    let format = detect_format(content);
    let outcome = match parser_for(format) {
        Some(parser) => parser.parse(content, ctx),
        None => ParseOutcome::default(),
    };
    (format, outcome)
}
