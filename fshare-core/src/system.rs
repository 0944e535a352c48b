// fshare-core/src/system.rs
//! Filesystem operations on system-wide locations (install prefix, share
//! directory). They usually need elevated rights, so the pipeline receives
//! them as a capability instead of touching the filesystem directly.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use fshare_aio::fs as fshare_fs;
use fshare_common::error::{FshareError, Result};
use tracing::{debug, error, warn};

pub trait SystemFs: Send + Sync {
    /// Whether anything (including a dangling symlink) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    fn set_executable(&self, path: &Path) -> Result<()>;

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Removes a file, symlink or directory tree. Returns `false` if nothing
    /// was there.
    fn remove_path(&self, path: &Path) -> Result<bool>;
}

/// Operates on the real filesystem. With `use_sudo`, an operation that fails
/// with `PermissionDenied` is retried once through `sudo`.
#[derive(Debug, Clone, Default)]
pub struct HostFs {
    use_sudo: bool,
}

impl HostFs {
    pub fn new(use_sudo: bool) -> Self {
        Self { use_sudo }
    }

    fn with_sudo_fallback<T>(
        &self,
        what: &str,
        direct: impl FnOnce() -> Result<T>,
        sudo_args: &[&OsStr],
        on_sudo: T,
    ) -> Result<T> {
        match direct() {
            Err(e) if self.use_sudo && e.is_permission_denied() => {
                warn!("{} failed (Permission Denied). Trying with sudo.", what);
                run_sudo(sudo_args)?;
                Ok(on_sudo)
            }
            other => other,
        }
    }
}

impl SystemFs for HostFs {
    fn exists(&self, path: &Path) -> bool {
        fshare_fs::check_symlink_exists(path)
    }

    fn set_executable(&self, path: &Path) -> Result<()> {
        self.with_sudo_fallback(
            &format!("chmod 755 {}", path.display()),
            || fshare_fs::set_permissions(path, 0o755),
            &[OsStr::new("chmod"), OsStr::new("755"), path.as_os_str()],
            (),
        )
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        self.with_sudo_fallback(
            &format!("cp {} {}", from.display(), to.display()),
            || fshare_fs::copy_file(from, to).map(|_| ()),
            &[OsStr::new("cp"), from.as_os_str(), to.as_os_str()],
            (),
        )
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.with_sudo_fallback(
            &format!("mkdir -p {}", path.display()),
            || fshare_fs::create_dir_all(path),
            &[OsStr::new("mkdir"), OsStr::new("-p"), path.as_os_str()],
            (),
        )
    }

    fn remove_path(&self, path: &Path) -> Result<bool> {
        self.with_sudo_fallback(
            &format!("rm -rf {}", path.display()),
            || fshare_fs::remove_path(path),
            &[OsStr::new("rm"), OsStr::new("-rf"), path.as_os_str()],
            true,
        )
    }
}

fn run_sudo(args: &[&OsStr]) -> Result<()> {
    let line = args
        .iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    debug!("Running: sudo {}", line);
    let output = Command::new("sudo").args(args).output().map_err(|e| {
        error!("Error executing sudo {}: {}", line, e);
        FshareError::CommandExecError(format!("sudo {line}: {e}"))
    })?;
    if output.status.success() {
        debug!("Successfully ran sudo {}", line);
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    error!("sudo {} failed: {}", line, stderr);
    Err(FshareError::ToolchainFailure {
        command: format!("sudo {line}"),
        status: output
            .status
            .code()
            .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}")),
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn host_fs_round_trip() {
        let dir = TempDir::new().unwrap();
        let fs = HostFs::new(false);
        let src = dir.path().join("tool");
        std::fs::write(&src, b"#!/bin/sh\n").unwrap();

        fs.set_executable(&src).unwrap();
        let nested = dir.path().join("share/tool");
        fs.create_dir_all(&nested).unwrap();
        fs.create_dir_all(&nested).unwrap();
        fs.copy_file(&src, &nested.join("tool")).unwrap();

        assert!(fs.exists(&nested.join("tool")));
        assert!(fs.remove_path(&dir.path().join("share")).unwrap());
        assert!(!fs.remove_path(&dir.path().join("share")).unwrap());
        assert!(!fs.exists(&nested));
    }

    #[cfg(unix)]
    #[test]
    fn set_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bin");
        std::fs::write(&file, b"").unwrap();
        HostFs::default().set_executable(&file).unwrap();
        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
