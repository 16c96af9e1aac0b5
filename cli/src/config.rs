//! Run configuration: source table and input/output locations.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use openbibles_backend::{Language, SourceConfig, Testament};

pub const DEFAULT_SOURCES_DIR: &str = "sources";
pub const DEFAULT_BOOK_MAP_PATH: &str = "data_normalized/book_map.json";
pub const DEFAULT_OUTPUT_PATH: &str = "data_normalized/original_verses.json";

/// The built-in source table, in processing order.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("WLC", Language::Hebrew, "Westminster Leningrad Codex", Testament::Old),
        SourceConfig::new("SBLGNT", Language::Greek, "SBL Greek New Testament", Testament::New),
    ]
}

/// Load a JSON array of SourceConfig. Source codes must be unique.
pub fn load_sources(path: &Path) -> Result<Vec<SourceConfig>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sources config: {}", path.display()))?;
    let sources: Vec<SourceConfig> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse sources config: {}", path.display()))?;
    validate_sources(&sources)?;
    Ok(sources)
}

pub fn validate_sources(sources: &[SourceConfig]) -> Result<()> {
    if sources.is_empty() {
        anyhow::bail!("No sources configured");
    }
    let mut seen = HashSet::new();
    for s in sources {
        if s.code.trim().is_empty() {
            anyhow::bail!("Source with empty code: {:?}", s.display_name);
        }
        if !seen.insert(s.code.as_str()) {
            anyhow::bail!("Duplicate source code: {}", s.code);
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory holding one sub-directory per source code
    pub sources_dir: PathBuf,
    pub book_map_path: PathBuf,
    pub sources: Vec<SourceConfig>,
}

impl PipelineConfig {
    pub fn new(sources_dir: PathBuf, book_map_path: PathBuf, sources: Vec<SourceConfig>) -> Self {
        PipelineConfig { sources_dir, book_map_path, sources }
    }

    /// Keep only the sources whose code is listed (case-insensitive). An empty list keeps all.
    pub fn only_sources(mut self, codes: &[String]) -> Result<Self> {
        if codes.is_empty() {
            return Ok(self);
        }
        for code in codes {
            if !self.sources.iter().any(|s| s.code.eq_ignore_ascii_case(code)) {
                anyhow::bail!("Unknown source code: {}", code);
            }
        }
        self.sources.retain(|s| codes.iter().any(|c| s.code.eq_ignore_ascii_case(c)));
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig::new(PathBuf::from("sources"), PathBuf::from("book_map.json"), default_sources())
    }

    #[test]
    fn test_default_sources() {
        let sources = default_sources();
        let codes: Vec<&str> = sources.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["WLC", "SBLGNT"]);
        assert_eq!(sources[0].language, Language::Hebrew);
        assert_eq!(sources[1].testament, Testament::New);
        assert!(validate_sources(&sources).is_ok());
    }

    #[test]
    fn test_duplicate_codes_are_rejected() {
        let mut sources = default_sources();
        sources.push(sources[0].clone());
        assert!(validate_sources(&sources).is_err());
        assert!(validate_sources(&[]).is_err());
    }

    #[test]
    fn test_only_sources() {
        let c = config().only_sources(&["sblgnt".to_string()]).unwrap();
        assert_eq!(c.sources.len(), 1);
        assert_eq!(c.sources[0].code, "SBLGNT");

        assert_eq!(config().only_sources(&[]).unwrap().sources.len(), 2);
        assert!(config().only_sources(&["LXX".to_string()]).is_err());
    }
}
