// fshare-core/src/workspace.rs
use std::path::{Path, PathBuf};

use fshare_aio::fs as fshare_fs;
use fshare_common::error::Result;
use tracing::debug;

/// The scratch directory a package is fetched, extracted and built in.
///
/// Every pipeline stage receives the workspace explicitly. Two pipelines must
/// not share one workspace at the same time; nothing guards against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Creates the directory if it is missing.
    pub fn ensure(&self) -> Result<()> {
        fshare_fs::create_dir_all(&self.root)
    }

    /// Deletes the directory tree. A missing workspace is not an error.
    pub fn reset(&self) -> Result<()> {
        if fshare_fs::remove_path(&self.root)? {
            debug!("Workspace {} removed", self.root.display());
        }
        Ok(())
    }

    pub fn is_empty(&self) -> Result<bool> {
        fshare_fs::is_dir_empty(&self.root)
    }
}
