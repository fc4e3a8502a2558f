use std::path::{Path, PathBuf};

use headline_core::RunResult;
use headline_logging::headline_info;

use crate::persist::{remove_matching, write_atomic, PersistError};

/// Final consumer of a run.
pub trait Loader {
    /// Returns the artifact path, or `None` when the run had nothing to save.
    fn write(&self, result: RunResult) -> Result<Option<PathBuf>, PersistError>;
}

/// Writes `<prefix>_YYYYMMDD_HHMMSS.txt`, one title per line, UTF-8.
#[derive(Debug, Clone)]
pub struct TitleFileLoader {
    dir: PathBuf,
    prefix: String,
    prune_previous: bool,
}

impl TitleFileLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "titles".to_string(),
            prune_previous: true,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// When set, earlier artifacts with the same prefix are deleted before writing.
    pub fn with_prune_previous(mut self, prune: bool) -> Self {
        self.prune_previous = prune;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name_for(&self, result: &RunResult) -> String {
        format!(
            "{}_{}.txt",
            self.prefix,
            result.created_at().format("%Y%m%d_%H%M%S")
        )
    }

    fn is_artifact(&self, name: &str) -> bool {
        name.strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|rest| rest.ends_with(".txt"))
    }
}

impl Loader for TitleFileLoader {
    fn write(&self, result: RunResult) -> Result<Option<PathBuf>, PersistError> {
        // An empty run must not replace the last good corpus.
        if result.is_empty() {
            headline_info!("No titles to write; {:?} left untouched", self.dir);
            return Ok(None);
        }

        let filename = self.file_name_for(&result);
        let mut content = String::new();
        for title in result.texts() {
            content.push_str(title);
            content.push('\n');
        }

        if self.prune_previous && self.dir.is_dir() {
            let removed = remove_matching(&self.dir, |name| self.is_artifact(name));
            if removed > 0 {
                headline_info!("Removed {} previous artifacts from {:?}", removed, self.dir);
            }
        }

        let path = write_atomic(&self.dir, &filename, &content)?;
        headline_info!("Wrote {} titles to {:?}", result.len(), path);
        Ok(Some(path))
    }
}
