use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// True for `.xml` files, any case of the extension.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xml"))
        .unwrap_or(false)
}

/// List the XML files directly inside a source directory, sorted by file name.
///
/// Sorting keeps the processing order, and with it the dedup tie-breaking, stable between runs.
pub fn discover_source_files(source_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(source_dir).min_depth(1).max_depth(1) {
        let entry = entry
            .with_context(|| format!("Failed to read directory: {}", source_dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && is_source_file(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
