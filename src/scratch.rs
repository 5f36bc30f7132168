//! Scratch directory lifecycle: one well-known directory, one run's artifacts at a time.

use globset::{Glob, GlobMatcher};

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Config, UiResult};

/// A regular file found directly inside the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
    artifacts: GlobMatcher,
}

impl ScratchDir {
    pub fn new(config: &Config) -> UiResult<Self> {
        let pattern = format!("{}*", globset::escape(&config.artifact_prefix));
        let artifacts = Glob::new(&pattern)?.compile_matcher();
        Ok(Self {
            root: config.scratch_dir.clone(),
            artifacts,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates the directory if needed, otherwise drops leftovers of earlier runs.
    pub fn ensure_clean(&self) -> UiResult<()> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)?;
            tracing::debug!("created scratch dir {}", self.root.display());
            return Ok(());
        }
        let removed = self.purge()?;
        if removed > 0 {
            tracing::debug!("removed {removed} stale artifact(s) from {}", self.root.display());
        }
        Ok(())
    }

    /// Removes every profiler artifact; unrelated files are left alone.
    pub fn purge(&self) -> UiResult<usize> {
        let artifacts = self.artifacts()?;
        for entry in &artifacts {
            std::fs::remove_file(&entry.path)?;
        }
        Ok(artifacts.len())
    }

    /// Profiler artifacts in directory-listing order.
    pub fn artifacts(&self) -> UiResult<Vec<ArtifactEntry>> {
        Ok(self
            .listing()?
            .into_iter()
            .filter(|e| self.artifacts.is_match(&e.name))
            .collect())
    }

    /// Every regular file in the directory, in listing order.
    pub fn listing(&self) -> UiResult<Vec<ArtifactEntry>> {
        let mut out = Vec::new();
        if !self.root.exists() {
            return Ok(out);
        }
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let size = entry.metadata()?.len();
            out.push(ArtifactEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path().to_path_buf(),
                size,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("profiler-ui-scratch-{name}-{}", Uuid::new_v4()))
    }

    fn scratch(root: &Path) -> ScratchDir {
        ScratchDir::new(&Config::with_scratch_dir(root)).expect("scratch")
    }

    #[test]
    fn ensure_clean_creates_missing_directory_with_parents() {
        let root = temp_dir("missing").join("nested").join("profiler");
        let dir = scratch(&root);
        dir.ensure_clean().expect("ensure clean");
        assert!(root.is_dir());
        assert!(dir.artifacts().expect("artifacts").is_empty());
    }

    #[test]
    fn ensure_clean_removes_artifacts_and_keeps_unrelated_files() {
        let root = temp_dir("mixed");
        std::fs::create_dir_all(&root).expect("mkdir");
        std::fs::write(root.join("profiler-ui.log"), b"log").expect("write");
        std::fs::write(root.join("profiler-ui.log_3"), b"step").expect("write");
        std::fs::write(root.join("profiler-ui.pprof.png"), b"img").expect("write");
        std::fs::write(root.join("notes.txt"), b"keep").expect("write");
        std::fs::write(root.join("other-profiler-ui.log"), b"keep").expect("write");

        let dir = scratch(&root);
        dir.ensure_clean().expect("ensure clean");

        assert!(dir.artifacts().expect("artifacts").is_empty());
        let mut left: Vec<String> = dir
            .listing()
            .expect("listing")
            .into_iter()
            .map(|e| e.name)
            .collect();
        left.sort();
        assert_eq!(left, vec!["notes.txt", "other-profiler-ui.log"]);
    }

    #[test]
    fn ensure_clean_is_idempotent_on_empty_directory() {
        let root = temp_dir("empty");
        let dir = scratch(&root);
        dir.ensure_clean().expect("first");
        dir.ensure_clean().expect("second");
        assert!(dir.listing().expect("listing").is_empty());
    }

    #[test]
    fn purge_on_missing_directory_removes_nothing() {
        let dir = scratch(&temp_dir("absent"));
        assert_eq!(dir.purge().expect("purge"), 0);
    }

    #[test]
    fn listing_reports_file_sizes() {
        let root = temp_dir("sizes");
        std::fs::create_dir_all(&root).expect("mkdir");
        std::fs::write(root.join("profiler-ui.log_1"), vec![0u8; 42]).expect("write");
        let entries = scratch(&root).artifacts().expect("artifacts");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].size, 42);
        assert_eq!(entries[0].name, "profiler-ui.log_1");
    }
}
