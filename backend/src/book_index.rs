//! Canonical book table
//!
//! Maps each dialect's textual book identifier (OSIS codes like `Gen`,
//! nested-dialect codes like `GEN`) to one canonical book number.
//! Lookups are case-insensitive.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Language, Testament};

#[derive(Debug, Error)]
pub enum BookIndexError {
    #[error("Failed to read book table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse book table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Book table is empty")]
    EmptyTable,

    #[error("Book id '{id}' maps to both book {first} and book {second}")]
    ConflictingId { id: String, first: u32, second: u32 },

    #[error("Book {book_number} is listed with both {first} and {second}")]
    ConflictingLanguage { book_number: u32, first: Language, second: Language },
}

/// One entry of the canonical book table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookDescriptor {
    #[serde(alias = "osis", alias = "osisCode", alias = "osis_code")]
    pub textual_id: String,
    #[serde(alias = "bookNumber")]
    pub book_number: u32,
    pub language: Language,
    #[serde(default)]
    pub testament: Option<Testament>,
    #[serde(default)]
    pub name: Option<String>,
    /// Alternate textual ids, e.g. the three-letter codes of the nested dialect
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl BookDescriptor {
    pub fn new(textual_id: &str, book_number: u32, language: Language) -> Self {
        BookDescriptor {
            textual_id: textual_id.to_string(),
            book_number,
            language,
            testament: None,
            name: None,
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn testament(&self) -> Testament {
        self.testament.unwrap_or_else(|| Testament::for_book_number(self.book_number))
    }
}

/// Read-only lookup shared by every parser for the whole run.
#[derive(Debug, Clone)]
pub struct BookIndex {
    books: Vec<BookDescriptor>,
    by_id: HashMap<String, usize>,
    by_number: HashMap<u32, usize>,
}

impl BookIndex {
    pub fn from_descriptors(books: Vec<BookDescriptor>) -> Result<Self, BookIndexError> {
        if books.is_empty() {
            return Err(BookIndexError::EmptyTable);
        }

        let mut by_id: HashMap<String, usize> = HashMap::new();
        let mut by_number: HashMap<u32, usize> = HashMap::new();

        for (idx, book) in books.iter().enumerate() {
            if let Some(&prev) = by_number.get(&book.book_number) {
                if books[prev].language != book.language {
                    return Err(BookIndexError::ConflictingLanguage {
                        book_number: book.book_number,
                        first: books[prev].language,
                        second: book.language,
                    });
                }
            } else {
                by_number.insert(book.book_number, idx);
            }

            let ids = std::iter::once(&book.textual_id).chain(book.aliases.iter());
            for id in ids {
                let key = id.trim().to_lowercase();
                if key.is_empty() {
                    continue;
                }
                match by_id.get(&key) {
                    Some(&prev) if books[prev].book_number != book.book_number => {
                        return Err(BookIndexError::ConflictingId {
                            id: id.clone(),
                            first: books[prev].book_number,
                            second: book.book_number,
                        });
                    }
                    Some(_) => {}
                    None => {
                        by_id.insert(key, idx);
                    }
                }
            }
        }

        Ok(BookIndex { books, by_id, by_number })
    }

    pub fn from_json_str(json: &str) -> Result<Self, BookIndexError> {
        let books: Vec<BookDescriptor> = serde_json::from_str(json)?;
        BookIndex::from_descriptors(books)
    }

    pub fn load_json(path: &Path) -> Result<Self, BookIndexError> {
        let content = fs::read_to_string(path)?;
        BookIndex::from_json_str(&content)
    }

    /// Case-insensitive lookup by textual id or alias.
    pub fn lookup(&self, textual_id: &str) -> Option<&BookDescriptor> {
        self.by_id
            .get(&textual_id.trim().to_lowercase())
            .map(|&idx| &self.books[idx])
    }

    pub fn by_number(&self, book_number: u32) -> Option<&BookDescriptor> {
        self.by_number.get(&book_number).map(|&idx| &self.books[idx])
    }

    pub fn books(&self) -> &[BookDescriptor] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
