//! Dot-separated verse references, e.g. `Gen.1.1` or `Ps.119.1`.

use thiserror::Error;

use crate::book_index::BookIndex;
use crate::helpers::leading_number;
use crate::types::Language;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Malformed reference '{reference}': {reason}")]
    Malformed { reference: String, reason: &'static str },

    #[error("Unknown book id: {0}")]
    UnknownBook(String),
}

/// A reference resolved against the book table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRef {
    pub book_number: u32,
    pub chapter: u32,
    pub verse: u32,
    pub language: Language,
}

/// Split a reference into its book id, chapter and verse, without any lookup.
///
/// At least three dot-separated parts are required, extra parts (sub-verse
/// segments) are ignored.
pub fn split_reference(reference: &str) -> Result<(&str, u32, u32), ReferenceError> {
    let malformed = |reason| ReferenceError::Malformed {
        reference: reference.to_string(),
        reason,
    };

    let parts: Vec<&str> = reference.trim().split('.').collect();
    if parts.len() < 3 {
        return Err(malformed("expected book.chapter.verse"));
    }

    let book_id = parts[0].trim();
    if book_id.is_empty() {
        return Err(malformed("empty book id"));
    }
    let chapter = leading_number(parts[1]).ok_or_else(|| malformed("chapter is not a positive number"))?;
    let verse = leading_number(parts[2]).ok_or_else(|| malformed("verse is not a positive number"))?;

    Ok((book_id, chapter, verse))
}

/// Resolve a reference against the book table.
///
/// An `osisID` may list several references separated by spaces; the first one is used.
pub fn resolve_reference(reference: &str, book_index: &BookIndex) -> Result<ResolvedRef, ReferenceError> {
    let first = reference.split_whitespace().next().unwrap_or_default();
    let (book_id, chapter, verse) = split_reference(first)?;

    let book = book_index
        .lookup(book_id)
        .ok_or_else(|| ReferenceError::UnknownBook(book_id.to_string()))?;

    Ok(ResolvedRef {
        book_number: book.book_number,
        chapter,
        verse,
        language: book.language,
    })
}
