//! Source file decoding
//!
//! Files are read as bytes. A byte order mark picks UTF-8, UTF-16LE or
//! UTF-16BE; without one the file is taken as UTF-8. Undecodable bytes become
//! U+FFFD with a warning, never an error. Line endings are normalized to LF.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};

use openbibles_backend::logger;

pub fn read_source_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(decode_source_bytes(&bytes, path))
}

/// The encoding named by a leading BOM and the BOM length, or UTF-8 and 0.
pub fn sniff_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    Encoding::for_bom(bytes).unwrap_or((UTF_8, 0))
}

pub fn decode_source_bytes(bytes: &[u8], path: &Path) -> String {
    let (encoding, bom_len) = sniff_encoding(bytes);

    logger::debug(&format!("{}: {} (BOM: {})", path.display(), encoding.name(), bom_len > 0));

    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        logger::warn(&format!("Invalid {} byte sequences replaced in {}", encoding.name(), path.display()));
    }

    if text.contains('\r') {
        text.replace("\r\n", "\n")
    } else {
        text.into_owned()
    }
}
