mod helpers;

use openbibles_backend::helpers::normalize_verse_text;
use openbibles_backend::parsers::{OsisMilestoneParser, UsfxParser};
use openbibles_backend::{ParseContext, VerseParser};

use helpers::{book_index, wlc};

#[test]
fn test_normalization_is_idempotent_on_real_markup() {
    let samples = [
        r#"<w lemma="b/7225" n="1.0" morph="HR/Ncfsa" id="01xeN">בְּ/רֵאשִׁ֖ית</w>
<w lemma="1254 a" n="1" morph="HVqp3ms" id="01Nvk">בָּרָ֣א</w>
<seg type="x-sof-pasuq">׃</seg>"#,
        r#"<note type="variant"><catchWord>x</catchWord><rdg type="x-qere"><w>y</w></rdg></note>"#,
        "<div type=\"section\">\n\n  <title>In   the beginning</title>\n</div>",
        "a<b",
        "a>b",
        "<>",
        "   ",
    ];
    for s in samples {
        let once = normalize_verse_text(s);
        assert_eq!(normalize_verse_text(&once), once);
        assert_eq!(once.trim(), once);
        assert!(!once.contains("  "));
    }
}

#[test]
fn test_milestone_fragment_with_inner_tag() {
    let index = book_index();
    let source = wlc();
    let ctx = ParseContext::new(&index, &source);

    let doc = r#"<verse osisID="Gen.1.1" sID="Gen.1.1"/>in <milestone type="x-p"/>the beginning<verse eID="Gen.1.1"/>"#;
    let outcome = OsisMilestoneParser.parse(doc, &ctx);

    assert_eq!(outcome.verses.len(), 1);
    assert_eq!(outcome.verses[0].position(), (1, 1, 1));
    assert_eq!(outcome.verses[0].original_text, "in the beginning");
}

#[test]
fn test_milestone_end_without_start_yields_nothing() {
    let index = book_index();
    let source = wlc();
    let ctx = ParseContext::new(&index, &source);

    let outcome = OsisMilestoneParser.parse(r#"<verse eID="Gen.1.1"/>"#, &ctx);
    assert!(outcome.verses.is_empty());
    assert_eq!(outcome.skipped(), 0);
}

#[test]
fn test_nested_dialect_positions_do_not_depend_on_preceding_content() {
    let index = book_index();
    let source = wlc();
    let ctx = ParseContext::new(&index, &source);

    let mut doc = String::from(r#"<usfx><book id="GEN">"#);
    for chapter in 1..=3 {
        doc.push_str(&format!(r#"<c n="{}">"#, chapter));
        for verse in 1..=chapter * 2 {
            doc.push_str(&format!(r#"<v n="{}">text {}.{}</v>"#, verse, chapter, verse));
        }
    }
    doc.push_str("</book></usfx>");

    let outcome = UsfxParser.parse(&doc, &ctx);
    assert_eq!(outcome.verses.len(), 2 + 4 + 6);
    for v in &outcome.verses {
        assert_eq!(v.book_number, 1);
        assert_eq!(v.original_text, format!("text {}.{}", v.chapter, v.verse));
    }
    let last = outcome.verses.last().unwrap();
    assert_eq!((last.chapter, last.verse), (3, 6));
}

#[test]
fn test_unresolved_book_in_milestone_leaves_siblings_intact() {
    let index = book_index();
    let source = wlc();
    let ctx = ParseContext::new(&index, &source);

    let doc = r#"<verse osisID="Gen.1.1" sID="1"/>a<verse eID="1"/><verse osisID="Bar.1.1" sID="2"/>b<verse eID="2"/><verse osisID="Gen.1.2" sID="3"/>c<verse eID="3"/>"#;
    let outcome = OsisMilestoneParser.parse(doc, &ctx);

    let texts: Vec<&str> = outcome.verses.iter().map(|v| v.original_text.as_str()).collect();
    assert_eq!(texts, vec!["a", "c"]);
    assert_eq!(outcome.unknown_books, 1);
}
