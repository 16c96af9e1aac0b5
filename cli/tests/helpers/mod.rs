use std::fs;
use std::path::{Path, PathBuf};

use openbibles_backend::{Language, SourceConfig, Testament};
use openbibles_cli::config::{default_sources, PipelineConfig};

pub fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

pub fn fixture_config() -> PipelineConfig {
    let data = data_dir();
    PipelineConfig::new(data.join("sources"), data.join("book_map.json"), default_sources())
}

#[allow(dead_code)]
pub fn source(code: &str) -> SourceConfig {
    SourceConfig::new(code, Language::Hebrew, code, Testament::Old)
}

/// A scratch directory under the system temp dir, removed on drop.
pub struct ScratchDir {
    pub path: PathBuf,
}

impl ScratchDir {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("openbibles_{}_{}", name, std::process::id()));
        if path.exists() {
            fs::remove_dir_all(&path).expect("remove stale scratch dir");
        }
        fs::create_dir_all(&path).expect("create scratch dir");
        ScratchDir { path }
    }

    #[allow(dead_code)]
    pub fn write(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.path.join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write scratch file");
        path
    }

    /// PipelineConfig over `<scratch>/sources` using the fixture book table.
    #[allow(dead_code)]
    pub fn config(&self, sources: Vec<SourceConfig>) -> PipelineConfig {
        PipelineConfig::new(self.path.join("sources"), data_dir().join("book_map.json"), sources)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
