//! Filesystem-backed content path probe.

use std::path::{Path, PathBuf};

use herofoundry_domain::ContentPathProbe;

/// Checks ruleset content paths on disk.
///
/// Relative paths are resolved against the content root; absolute paths are
/// checked as-is.
#[derive(Debug, Clone)]
pub struct FsContentProbe {
    root: PathBuf,
}

impl FsContentProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }
}

impl ContentPathProbe for FsContentProbe {
    fn exists(&self, path: &str) -> bool {
        let resolved = self.resolve(path);
        let exists = resolved.exists();
        if !exists {
            tracing::debug!(path = %resolved.display(), "Ruleset content path not found");
        }
        exists
    }
}
