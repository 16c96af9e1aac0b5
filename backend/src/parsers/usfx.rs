//! USFX-like nesting: `<book id="GEN">` > `<c n="1">` > `<v n="1">...</v>`
//!
//! The book id is resolved once per book. Chapter and verse numbers are read
//! from `n` or `id`. Besides the paired `<v>...</v>` form, a self-closing
//! `<v id="1"/>` followed by text up to `<ve/>` is accepted as well.

use regex::{Match, Regex};
use lazy_static::lazy_static;

use crate::book_index::BookDescriptor;
use crate::helpers::{is_self_closing, leading_number, parse_attributes};
use crate::logger;
use crate::reference::ResolvedRef;
use crate::types::ParseOutcome;

use super::{ParseContext, VerseParser};

lazy_static! {
    static ref RE_BOOK: Regex = Regex::new(r"<book\b([^>]*)>").unwrap();
    static ref RE_CHAPTER: Regex = Regex::new(r"<c\b([^>]*)>").unwrap();
    static ref RE_VERSE_START: Regex = Regex::new(r"<v\b([^>]*)>").unwrap();
    static ref RE_VERSE_MILESTONE_END: Regex = Regex::new(r"<ve\b[^>]*>").unwrap();
}

const VERSE_END: &str = "</v>";

/// Split `content` on the markers matched by `re`, giving the attributes of
/// each marker and the body up to the next marker. Content before the first
/// marker is dropped.
fn split_on_markers<'a>(re: &Regex, content: &'a str) -> Vec<(&'a str, &'a str)> {
    let markers: Vec<(Match<'a>, &'a str)> = re
        .captures_iter(content)
        .filter_map(|caps| {
            let tag = caps.get(0)?;
            let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            Some((tag, attrs))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(idx, (tag, attrs))| {
            let end = markers.get(idx + 1).map(|(next, _)| next.start()).unwrap_or(content.len());
            (*attrs, &content[tag.end()..end])
        })
        .collect()
}

/// Content before the first marker matched by `re`, all of it when there is none.
fn before_first_marker<'a>(re: &Regex, content: &'a str) -> &'a str {
    re.find(content).map(|m| &content[..m.start()]).unwrap_or(content)
}

/// Verses outside any book or chapter cannot be placed; they are counted as malformed.
fn count_orphan_verses(fragment: &str, outside: &str, ctx: &ParseContext, outcome: &mut ParseOutcome) {
    let orphans = RE_VERSE_START.find_iter(fragment).count();
    if orphans > 0 {
        logger::warn(&format!("  {}: {} verses outside any {}, skipping", ctx.source.code, orphans, outside));
        outcome.malformed_refs += orphans;
    }
}

/// Chapter or verse number from `n`, falling back to `id`.
fn marker_number(attrs_str: &str) -> Option<u32> {
    let attrs = parse_attributes(attrs_str);
    attrs.get("n").or_else(|| attrs.get("id")).and_then(|s| leading_number(s))
}

/// End of a milestone-form verse body: `<ve/>`, the next verse, or the end of the chapter.
fn milestone_verse_end(body: &str, from: usize) -> usize {
    let ve = RE_VERSE_MILESTONE_END.find_at(body, from).map(|m| m.start());
    let next = RE_VERSE_START.find_at(body, from).map(|m| m.start());
    ve.into_iter().chain(next).min().unwrap_or(body.len())
}

fn parse_chapter(
    book: &BookDescriptor,
    chapter: Option<u32>,
    body: &str,
    ctx: &ParseContext,
    outcome: &mut ParseOutcome,
) {
    let mut pos = 0;

    while let Some(caps) = RE_VERSE_START.captures_at(body, pos) {
        let Some(tag) = caps.get(0) else { break };
        let attrs_str = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        pos = tag.end();

        let verse_body = if is_self_closing(attrs_str) {
            &body[pos..milestone_verse_end(body, pos)]
        } else {
            // The closing tag must come before the next verse marker
            let limit = RE_VERSE_START.find_at(body, pos).map(|m| m.start()).unwrap_or(body.len());
            let Some(end_offset) = body[pos..limit].find(VERSE_END) else {
                logger::warn(&format!(
                    "  {}: unclosed <v> in {} chapter {:?}, skipping verse",
                    ctx.source.code, book.textual_id, chapter
                ));
                outcome.malformed_refs += 1;
                continue;
            };
            let verse_body = &body[pos..pos + end_offset];
            pos += end_offset + VERSE_END.len();
            verse_body
        };

        match (chapter, marker_number(attrs_str)) {
            (Some(chapter), Some(verse)) => {
                let verse_ref = ResolvedRef {
                    book_number: book.book_number,
                    chapter,
                    verse,
                    language: book.language,
                };
                ctx.emit(verse_ref, verse_body, outcome);
            }
            (chapter, verse) => {
                logger::warn(&format!(
                    "  {}: {} chapter {:?} verse {:?}: missing or malformed number, skipping verse",
                    ctx.source.code, book.textual_id, chapter, verse
                ));
                outcome.malformed_refs += 1;
            }
        }
    }
}

pub struct UsfxParser;

impl VerseParser for UsfxParser {
    fn parse(&self, content: &str, ctx: &ParseContext) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        count_orphan_verses(before_first_marker(&RE_BOOK, content), "book", ctx, &mut outcome);

        for (book_attrs, book_body) in split_on_markers(&RE_BOOK, content) {
            let attrs = parse_attributes(book_attrs);
            let Some(book_id) = attrs.get("id") else {
                logger::warn(&format!("  {}: book element without id, skipping", ctx.source.code));
                outcome.malformed_refs += 1;
                continue;
            };

            let Some(book) = ctx.book_index.lookup(book_id) else {
                logger::warn(&format!("  Unknown USFX book ID: {}", book_id));
                outcome.unknown_books += 1;
                continue;
            };

            count_orphan_verses(before_first_marker(&RE_CHAPTER, book_body), "chapter", ctx, &mut outcome);

            for (chapter_attrs, chapter_body) in split_on_markers(&RE_CHAPTER, book_body) {
                parse_chapter(book, marker_number(chapter_attrs), chapter_body, ctx, &mut outcome);
            }
        }

        outcome
    }
}
