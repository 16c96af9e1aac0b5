use openbibles_backend::{BookDescriptor, BookIndex, Language, SourceConfig, Testament};

pub fn book_index() -> BookIndex {
    BookIndex::from_descriptors(vec![
        BookDescriptor::new("Gen", 1, Language::Hebrew).with_aliases(&["GEN"]),
        BookDescriptor::new("Exod", 2, Language::Hebrew).with_aliases(&["EXO"]),
        BookDescriptor::new("Ps", 19, Language::Hebrew).with_aliases(&["PSA"]),
        BookDescriptor::new("Matt", 40, Language::Greek).with_aliases(&["MAT"]),
        BookDescriptor::new("John", 43, Language::Greek).with_aliases(&["JHN"]),
    ]).expect("valid book table")
}

#[allow(dead_code)]
pub fn wlc() -> SourceConfig {
    SourceConfig::new("WLC", Language::Hebrew, "Westminster Leningrad Codex", Testament::Old)
}

#[allow(dead_code)]
pub fn sblgnt() -> SourceConfig {
    SourceConfig::new("SBLGNT", Language::Greek, "SBL Greek New Testament", Testament::New)
}
