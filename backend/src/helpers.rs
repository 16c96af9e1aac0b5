use std::collections::HashMap;

use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    // <w lemma="b/7225" morph="HR/Ncfsa">בְּ/רֵאשִׁ֖ית</w>
    static ref RE_WORD_START: Regex = Regex::new(r"<w\b[^>]*>").unwrap();
    static ref RE_WORD_END: Regex = Regex::new(r"</w\s*>").unwrap();
    static ref RE_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // name="value" or name='value'
    static ref RE_ATTRIBUTE: Regex = Regex::new(
        r#"([A-Za-z_:][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#
    ).unwrap();
}

/// Strip all markup from a verse fragment and collapse whitespace.
///
/// Word start tags are dropped, word end tags become a space so that adjacent
/// words are not glued together, every other tag is dropped. The result is
/// trimmed. Applying it twice gives the same result as applying it once.
///
/// An empty result means the fragment has no verse text.
pub fn normalize_verse_text(fragment: &str) -> String {
    let s = RE_WORD_START.replace_all(fragment, "");
    let s = RE_WORD_END.replace_all(&s, " ");
    let s = RE_TAG.replace_all(&s, "");
    let s = RE_WHITESPACE.replace_all(&s, " ");
    s.trim().to_string()
}

/// Parse the attributes of a start tag, in any order.
///
/// `attrs` is the part of the tag after the element name, e.g.
/// ` osisID="Gen.1.1" sID="Gen.1.1"/`. Later duplicates override earlier ones.
pub fn parse_attributes(attrs: &str) -> HashMap<&str, &str> {
    RE_ATTRIBUTE
        .captures_iter(attrs)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((name, value))
        })
        .collect()
}

/// True if the tag body ends with the self-closing slash.
pub fn is_self_closing(attrs: &str) -> bool {
    attrs.trim_end().ends_with('/')
}

/// Parse the leading decimal digits of a reference component.
///
/// "12" -> 12, "3a" -> 3, " 7" -> 7. Returns None when there are no leading
/// digits, or the number is zero.
pub fn leading_number(s: &str) -> Option<u32> {
    let s = s.trim();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    match s[..end].parse::<u32>() {
        Ok(n) if n > 0 => Some(n),
        _ => None,
    }
}
