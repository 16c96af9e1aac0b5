pub mod types;
pub mod helpers;
pub mod logger;
pub mod book_index;
pub mod reference;
pub mod format_detector;
pub mod parsers;
pub mod aggregator;

pub use aggregator::{aggregate_verses, group_by_source, AggregatedVerses, DatasetSummary};
pub use book_index::{BookDescriptor, BookIndex, BookIndexError};
pub use format_detector::{detect_format, DocumentFormat};
pub use parsers::{parse_document, parser_for, ParseContext, VerseParser};
pub use reference::{resolve_reference, ReferenceError, ResolvedRef};
pub use types::{Language, ParseOutcome, SourceConfig, Testament, VerseKey, VerseRecord};

/// Canonical book numbers from here on are New Testament books.
pub static NT_FIRST_BOOK_NUMBER: u32 = 40;

/// Verse count of the full two-testament corpus, used for a completeness warning.
pub static EXPECTED_FULL_CORPUS_VERSES: usize = 31_102;

/// Below this many verses a non-empty run is reported as possibly incomplete.
pub static INCOMPLETE_CORPUS_THRESHOLD: usize = 31_000;
