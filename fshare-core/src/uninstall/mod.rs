// fshare-core/src/uninstall/mod.rs

use std::fmt;
use std::path::{Path, PathBuf};

use fshare_common::error::Result;
use fshare_common::model::{InstallLayout, PackageName};
use tracing::{debug, error, info};

use crate::system::SystemFs;

/// State of one install location after a removal pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathState {
    Removed(PathBuf),
    Absent(PathBuf),
}

impl PathState {
    pub fn path(&self) -> &Path {
        match self {
            PathState::Removed(p) | PathState::Absent(p) => p,
        }
    }

    pub fn was_removed(&self) -> bool {
        matches!(self, PathState::Removed(_))
    }
}

impl fmt::Display for PathState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathState::Removed(p) => write!(f, "removed {}", p.display()),
            PathState::Absent(p) => write!(f, "{} not found", p.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalReport {
    pub package: PackageName,
    pub binary: PathState,
    pub package_dir: PathState,
}

impl RemovalReport {
    pub fn nothing_removed(&self) -> bool {
        !self.binary.was_removed() && !self.package_dir.was_removed()
    }
}

/// Removes `bin_dir/<package>` and `share_dir/<package>`. Each location is
/// handled on its own and a missing one is reported, not treated as an error,
/// so calling this repeatedly is safe.
pub fn remove_package<F>(fs: &F, layout: &InstallLayout, package: &PackageName) -> Result<RemovalReport>
where
    F: SystemFs + ?Sized,
{
    debug!("Uninstalling {}", package);
    let binary = remove_one(fs, layout.binary_path(package.as_str()))?;
    let package_dir = remove_one(fs, layout.package_dir(package.as_str()))?;
    Ok(RemovalReport {
        package: package.clone(),
        binary,
        package_dir,
    })
}

fn remove_one<F>(fs: &F, path: PathBuf) -> Result<PathState>
where
    F: SystemFs + ?Sized,
{
    if !fs.exists(&path) {
        debug!("Not installed: {}", path.display());
        return Ok(PathState::Absent(path));
    }
    match fs.remove_path(&path) {
        Ok(true) => {
            info!("Removed {}", path.display());
            Ok(PathState::Removed(path))
        }
        Ok(false) => Ok(PathState::Absent(path)),
        Err(e) => {
            error!("Failed to remove {}: {}", path.display(), e);
            Err(e)
        }
    }
}
