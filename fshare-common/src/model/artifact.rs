// fshare-common/src/model/artifact.rs
use std::path::PathBuf;

/// The single file produced by a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Where packages are installed: executables go into `bin_dir`, and every
/// package gets a mirror directory under `share_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub bin_dir: PathBuf,
    pub share_dir: PathBuf,
}

impl InstallLayout {
    pub fn new(bin_dir: impl Into<PathBuf>, share_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            share_dir: share_dir.into(),
        }
    }

    pub fn binary_path(&self, file_name: &str) -> PathBuf {
        self.bin_dir.join(file_name)
    }

    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.share_dir.join(package)
    }
}

/// An installed package. Nothing is recorded besides the files themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub binary: PathBuf,
    pub package_dir: PathBuf,
    pub mirrored: PathBuf,
}
