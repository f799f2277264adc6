//! The version-marker file store.
//!
//! The version file holds the current tag name as its full contents.
//! Resolution searches upward from the working directory (the file may
//! live at the repository root while the tool runs in a subdirectory);
//! when no existing file is found anywhere, the working directory is
//! the target and the file is created there on write.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, instrument};

/// Version-file resolution and writing, behind a seam for tests.
pub trait VersionStore {
    /// Resolve the target path for the named version file.
    fn resolve_path(&self, file_name: &str) -> Utf8PathBuf;

    /// Replace the file's contents.
    fn write(&self, path: &Utf8Path, contents: &str) -> io::Result<()>;
}

/// [`VersionStore`] backed by the filesystem, rooted at a working directory.
#[derive(Debug, Clone)]
pub struct FsVersionStore {
    root: Utf8PathBuf,
}

impl FsVersionStore {
    /// Create a store that searches upward from `root`.
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }
}

impl VersionStore for FsVersionStore {
    #[instrument(skip(self))]
    fn resolve_path(&self, file_name: &str) -> Utf8PathBuf {
        let mut current = Some(self.root.clone());
        while let Some(dir) = current {
            let candidate = dir.join(file_name);
            if candidate.is_file() {
                debug!(path = %candidate, "found existing version file");
                return candidate;
            }
            current = dir.parent().map(Utf8Path::to_path_buf);
        }
        // No existing file anywhere up the tree: create in the working dir.
        let fallback = self.root.join(file_name);
        debug!(path = %fallback, "version file not found, using working directory");
        fallback
    }

    fn write(&self, path: &Utf8Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }
}
