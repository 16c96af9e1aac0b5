//! OSIS with complete verse elements: `<verse osisID="Gen.1.1">...</verse>`

use regex::Regex;
use lazy_static::lazy_static;

use crate::helpers::{is_self_closing, parse_attributes};
use crate::logger;
use crate::types::ParseOutcome;

use super::{ParseContext, VerseParser};

lazy_static! {
    static ref RE_VERSE_START: Regex = Regex::new(r"<verse\b([^>]*)>").unwrap();
}

const VERSE_END: &str = "</verse>";

/// Start of the next verse element that can hold text, at or after `from`.
fn next_open_verse(content: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(caps) = RE_VERSE_START.captures_at(content, pos) {
        let tag = caps.get(0)?;
        let attrs_str = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        if !is_self_closing(attrs_str) {
            return Some(tag.start());
        }
        pos = tag.end();
    }
    None
}

pub struct OsisInlineParser;

impl VerseParser for OsisInlineParser {
    fn parse(&self, content: &str, ctx: &ParseContext) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        let mut no_text_markers = 0;
        let mut pos = 0;

        while let Some(caps) = RE_VERSE_START.captures_at(content, pos) {
            let Some(tag) = caps.get(0) else { break };
            let attrs_str = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            pos = tag.end();

            // <verse eID="Gen.1.1"/> and similar point markers carry no text
            if is_self_closing(attrs_str) {
                no_text_markers += 1;
                continue;
            }

            // The closing tag must come before the next verse opens
            let limit = next_open_verse(content, pos).unwrap_or(content.len());
            let Some(end_offset) = content[pos..limit].find(VERSE_END) else {
                logger::warn(&format!("  {}: unclosed verse element at byte {}, skipping", ctx.source.code, tag.start()));
                outcome.malformed_refs += 1;
                continue;
            };
            let body = &content[pos..pos + end_offset];
            pos += end_offset + VERSE_END.len();

            let attrs = parse_attributes(attrs_str);
            let Some(osis_id) = attrs.get("osisID") else {
                logger::warn(&format!("  {}: verse element without osisID at byte {}", ctx.source.code, tag.start()));
                outcome.malformed_refs += 1;
                continue;
            };

            if let Some(verse_ref) = ctx.resolve(osis_id, &mut outcome) {
                ctx.emit(verse_ref, body, &mut outcome);
            }
        }

        if no_text_markers > 0 {
            logger::debug(&format!("  {}: skipped {} self-closing verse markers", ctx.source.code, no_text_markers));
        }

        outcome
    }
}
