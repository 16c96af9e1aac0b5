use std::fmt;

use serde::{Deserialize, Serialize};

use crate::NT_FIRST_BOOK_NUMBER;

/// Language of an original-language text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Hebrew,
    Aramaic,
    Greek,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hebrew => "hebrew",
            Language::Aramaic => "aramaic",
            Language::Greek => "greek",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Testament {
    #[serde(rename = "OT", alias = "ot")]
    Old,
    #[serde(rename = "NT", alias = "nt")]
    New,
}

impl Testament {
    /// Reporting split by canonical book number: 1-39 Old, 40 and above New.
    pub fn for_book_number(book_number: u32) -> Self {
        if book_number >= NT_FIRST_BOOK_NUMBER {
            Testament::New
        } else {
            Testament::Old
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Testament::Old => "OT",
            Testament::New => "NT",
        }
    }
}

impl fmt::Display for Testament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One physical source collection: a directory of files sharing one dialect
/// and one text tradition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// Short unique code, also the directory name under the sources root (e.g. "WLC")
    pub code: String,
    pub language: Language,
    #[serde(alias = "name", alias = "displayName")]
    pub display_name: String,
    pub testament: Testament,
}

impl SourceConfig {
    pub fn new(code: &str, language: Language, display_name: &str, testament: Testament) -> Self {
        SourceConfig {
            code: code.to_string(),
            language,
            display_name: display_name.to_string(),
            testament,
        }
    }
}

/// A single verse of original-language text, the unit of the output collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerseRecord {
    pub book_number: u32,
    pub chapter: u32,
    pub verse: u32,
    pub language: Language,
    /// Markup-free, whitespace-normalized, never empty
    pub original_text: String,
    pub transliteration: Option<String>,
    /// SourceConfig code, the grouping key for uploads
    pub source: String,
}

/// Identity of a verse record for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseKey {
    pub book_number: u32,
    pub chapter: u32,
    pub verse: u32,
    pub source: String,
}

impl VerseRecord {
    /// Ordering key of the output collection. The source is deliberately not part of it.
    pub fn position(&self) -> (u32, u32, u32) {
        (self.book_number, self.chapter, self.verse)
    }

    pub fn key(&self) -> VerseKey {
        VerseKey {
            book_number: self.book_number,
            chapter: self.chapter,
            verse: self.verse,
            source: self.source.clone(),
        }
    }

    pub fn testament(&self) -> Testament {
        Testament::for_book_number(self.book_number)
    }
}

/// Result of parsing one document.
///
/// Record-level problems never fail a parse, they are counted here instead.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub verses: Vec<VerseRecord>,
    /// References whose book id is not in the book table
    pub unknown_books: usize,
    /// References or numeric identifiers that could not be parsed
    pub malformed_refs: usize,
    /// Verses whose text was empty after normalization
    pub empty_verses: usize,
}

impl ParseOutcome {
    pub fn unresolved(&self) -> usize {
        self.unknown_books + self.malformed_refs
    }

    pub fn skipped(&self) -> usize {
        self.unresolved() + self.empty_verses
    }

    pub fn merge(&mut self, other: ParseOutcome) {
        self.verses.extend(other.verses);
        self.unknown_books += other.unknown_books;
        self.malformed_refs += other.malformed_refs;
        self.empty_verses += other.empty_verses;
    }
}
