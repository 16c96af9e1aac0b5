mod helpers;

use openbibles_backend::{parse_document, DocumentFormat, ParseContext};

use helpers::{book_index, sblgnt};

const VERSE_MARKUP: &str = r#"<w lemma="G1722">Ἐν</w> <w lemma="G746">ἀρχῇ</w><note type="x-variant"/>
<w lemma="G1510">ἦν</w> <w lemma="G3588">ὁ</w> <w lemma="G3056">λόγος</w>"#;

fn documents() -> Vec<(DocumentFormat, String)> {
    vec![
        (
            DocumentFormat::OsisInline,
            format!(r#"<osis><osisText><verse osisID="John.1.1">{}</verse></osisText></osis>"#, VERSE_MARKUP),
        ),
        (
            DocumentFormat::OsisMilestone,
            format!(
                "<osis><chapter sID=\"John.1\" osisID=\"John.1\"/>\n<verse osisID=\"John.1.1\" sID=\"John.1.1\"/>{}\n<verse eID=\"John.1.1\"/>\n</osis>",
                VERSE_MARKUP
            ),
        ),
        (
            DocumentFormat::Usfx,
            format!(r#"<usfx><book id="JHN"><c n="1"/><v n="1">{}</v></book></usfx>"#, VERSE_MARKUP),
        ),
    ]
}

#[test]
fn test_same_verse_normalizes_identically_in_every_dialect() {
    let index = book_index();
    let source = sblgnt();
    let ctx = ParseContext::new(&index, &source);

    for (expected_format, doc) in documents() {
        let (format, outcome) = parse_document(&doc, &ctx);
        assert_eq!(format, expected_format);
        assert_eq!(outcome.verses.len(), 1, "dialect {}", format);

        let v = &outcome.verses[0];
        assert_eq!((v.book_number, v.chapter, v.verse), (43, 1, 1));
        assert_eq!(v.original_text, "Ἐν ἀρχῇ ἦν ὁ λόγος");
        assert_eq!(v.source, "SBLGNT");
    }
}

#[test]
fn test_parsing_is_deterministic() {
    let index = book_index();
    let source = sblgnt();
    let ctx = ParseContext::new(&index, &source);

    for (_, doc) in documents() {
        let (_, first) = parse_document(&doc, &ctx);
        let (_, second) = parse_document(&doc, &ctx);
        assert_eq!(first.verses, second.verses);
    }
}
