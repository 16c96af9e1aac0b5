//! OSIS with milestone verses
//!
//! A verse is the content between a start marker and its end marker:
//!
//! ```xml
//! <verse osisID="Gen.1.1" sID="Gen.1.1"/><w>...</w> <note>...</note><verse eID="Gen.1.1"/>
//! ```
//!
//! Markers never nest and appear in document order, so a single scan with a
//! two-state machine (idle / collecting) is enough.

use std::mem;

use regex::Regex;
use lazy_static::lazy_static;

use crate::helpers::parse_attributes;
use crate::logger;
use crate::reference::{ReferenceError, ResolvedRef};
use crate::types::ParseOutcome;

use super::{record_reference_error, ParseContext, VerseParser};

lazy_static! {
    static ref RE_VERSE_TAG: Regex = Regex::new(r"<verse\b([^>]*)>").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneEvent<'a> {
    /// A start marker, with its osisID if it has one
    Start(Option<&'a str>),
    End,
    Content(&'a str),
}

/// Split a document into marker events and the content between them.
///
/// A verse tag with an `sID` is a start marker, otherwise a tag with an `eID`
/// is an end marker. Any other verse tag is passed on as content.
pub fn milestone_events(content: &str) -> Vec<MilestoneEvent<'_>> {
    let mut events = Vec::new();
    let mut pos = 0;

    for caps in RE_VERSE_TAG.captures_iter(content) {
        let Some(tag) = caps.get(0) else { continue };
        let attrs_str = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let attrs = parse_attributes(attrs_str);

        let event = if attrs.contains_key("sID") {
            MilestoneEvent::Start(attrs.get("osisID").copied())
        } else if attrs.contains_key("eID") {
            MilestoneEvent::End
        } else {
            continue;
        };

        if tag.start() > pos {
            events.push(MilestoneEvent::Content(&content[pos..tag.start()]));
        }
        events.push(event);
        pos = tag.end();
    }

    if pos < content.len() {
        events.push(MilestoneEvent::Content(&content[pos..]));
    }

    events
}

#[derive(Debug)]
enum MilestoneState {
    Idle,
    Collecting { verse_ref: ResolvedRef, buffer: String },
}

struct MilestoneScanner<'c, 'a> {
    ctx: &'c ParseContext<'a>,
    state: MilestoneState,
    outcome: ParseOutcome,
}

impl<'c, 'a> MilestoneScanner<'c, 'a> {
    fn new(ctx: &'c ParseContext<'a>) -> Self {
        MilestoneScanner {
            ctx,
            state: MilestoneState::Idle,
            outcome: ParseOutcome::default(),
        }
    }

    fn handle(&mut self, event: MilestoneEvent) {
        match event {
            MilestoneEvent::Start(reference) => self.on_start(reference),
            MilestoneEvent::End => self.on_end(),
            MilestoneEvent::Content(text) => self.on_content(text),
        }
    }

    /// Close any verse still open (missing end marker), then open the new one.
    /// An unresolvable reference leaves the scanner idle, its content is dropped.
    fn on_start(&mut self, reference: Option<&str>) {
        self.flush();

        let verse_ref = match reference {
            Some(r) => self.ctx.resolve(r, &mut self.outcome),
            None => {
                let e = ReferenceError::Malformed {
                    reference: String::new(),
                    reason: "start marker without osisID",
                };
                record_reference_error(&e, &mut self.outcome);
                None
            }
        };

        self.state = match verse_ref {
            Some(verse_ref) => MilestoneState::Collecting { verse_ref, buffer: String::new() },
            None => MilestoneState::Idle,
        };
    }

    /// An end marker with no open verse is ignored.
    fn on_end(&mut self) {
        if let MilestoneState::Collecting { verse_ref, buffer } = mem::replace(&mut self.state, MilestoneState::Idle) {
            self.ctx.emit(verse_ref, &buffer, &mut self.outcome);
        }
    }

    fn on_content(&mut self, text: &str) {
        if let MilestoneState::Collecting { buffer, .. } = &mut self.state {
            buffer.push_str(text);
        }
    }

    fn flush(&mut self) {
        if let MilestoneState::Collecting { verse_ref, buffer } = mem::replace(&mut self.state, MilestoneState::Idle) {
            if !buffer.is_empty() {
                logger::debug(&format!(
                    "  {}: verse {}:{} has no end marker",
                    self.ctx.source.code, verse_ref.chapter, verse_ref.verse
                ));
                self.ctx.emit(verse_ref, &buffer, &mut self.outcome);
            }
        }
    }

    fn finish(mut self) -> ParseOutcome {
        self.flush();
        self.outcome
    }
}

pub struct OsisMilestoneParser;

impl VerseParser for OsisMilestoneParser {
    fn parse(&self, content: &str, ctx: &ParseContext) -> ParseOutcome {
        let mut scanner = MilestoneScanner::new(ctx);
        for event in milestone_events(content) {
            scanner.handle(event);
        }
        scanner.finish()
    }
}
