//! Markup dialect detection from document content
//!
//! A cheap marker scan, the document is not parsed as XML.

use std::fmt;

use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    static ref RE_USFX_ROOT: Regex = Regex::new(r"(?i)<usfx").unwrap();
    // <verse ... sID="..."/>, but neither osisID="..." nor sID on <chapter> or <div>
    static ref RE_VERSE_START_ID: Regex = Regex::new(r"<verse\b[^>]*\bsID\s*=").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// book > chapter > verse nesting
    Usfx,
    /// verses delimited by sID/eID point markers
    OsisMilestone,
    /// each verse is a complete element
    OsisInline,
    Unrecognized,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Usfx => "usfx-like",
            DocumentFormat::OsisMilestone => "osis-milestone",
            DocumentFormat::OsisInline => "osis-inline",
            DocumentFormat::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a document by the structural markers it contains.
///
/// Precedence: the nested root marker, then a verse tag with a start-identifier attribute,
/// then a verse element or OSIS root.
pub fn detect_format(content: &str) -> DocumentFormat {
    if RE_USFX_ROOT.is_match(content) {
        DocumentFormat::Usfx
    } else if RE_VERSE_START_ID.is_match(content) {
        DocumentFormat::OsisMilestone
    } else if content.contains("<osis") || content.contains("<verse") {
        DocumentFormat::OsisInline
    } else {
        DocumentFormat::Unrecognized
    }
}
