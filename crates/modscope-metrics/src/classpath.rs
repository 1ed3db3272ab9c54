//! Classpath sizing over a module's resource tree.
//!
//! A module's classpath size is the number of class-like entries reachable
//! from its resource roots: plain files with the class suffix, plus entries
//! inside nested archive resources. Archives are opened one level deep only;
//! an archive inside an archive is not expanded. That depth cap bounds the
//! cost of sizing a pathological module and matches what a code-loading
//! context would actually serve cheaply.
//!
//! Sizing is best-effort. An unreadable root, file, or archive contributes
//! nothing to the count and is recorded in [`SizingOutcome::skipped`] so the
//! degradation stays observable instead of silently swallowed.

use std::fs::File;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use modscope_core::TrackerConfig;

/// Result of sizing a set of resource roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizingOutcome {
    /// Number of class-like entries counted.
    pub classes: u64,
    /// Paths that could not be read and were skipped.
    pub skipped: Vec<PathBuf>,
}

impl SizingOutcome {
    /// True if nothing was skipped.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Counts class-like resources under a module's resource roots.
#[derive(Debug, Clone)]
pub struct ClasspathSizer {
    class_suffix: String,
    archive_suffix: String,
}

impl Default for ClasspathSizer {
    fn default() -> Self {
        Self::from_config(&TrackerConfig::default())
    }
}

impl ClasspathSizer {
    /// Create a sizer with the default `.class` / `.jar` suffixes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sizer with the suffixes from a tracker configuration.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            class_suffix: config.class_suffix.clone(),
            archive_suffix: config.archive_suffix.clone(),
        }
    }

    /// Size all given roots.
    ///
    /// Zero roots yield a zero count. Each root is sized independently; a
    /// failure under one root never aborts the others.
    pub fn size(&self, roots: &[PathBuf]) -> SizingOutcome {
        let mut outcome = SizingOutcome::default();
        for root in roots {
            self.size_root(root, &mut outcome);
        }
        outcome
    }

    fn size_root(&self, root: &Path, outcome: &mut SizingOutcome) {
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable path");
                    outcome.skipped.push(path);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name.ends_with(&self.class_suffix) {
                outcome.classes += 1;
            } else if name.ends_with(&self.archive_suffix) {
                match self.archive_classes(entry.path()) {
                    Ok(count) => outcome.classes += count,
                    Err(err) => {
                        tracing::warn!(
                            path = %entry.path().display(),
                            error = %err,
                            "skipping unreadable archive"
                        );
                        outcome.skipped.push(entry.path().to_path_buf());
                    }
                }
            }
        }
    }

    /// Count class entries in an archive's entry list.
    ///
    /// Nested archives are listed but not opened.
    fn archive_classes(&self, path: &Path) -> Result<u64, zip::result::ZipError> {
        let file = File::open(path)?;
        let archive = zip::ZipArchive::new(file)?;
        let count = archive
            .file_names()
            .filter(|name| name.ends_with(&self.class_suffix))
            .count() as u64;
        Ok(count)
    }
}
