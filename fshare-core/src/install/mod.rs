// fshare-core/src/install/mod.rs

use fshare_common::error::{FshareError, Result};
use fshare_common::model::{Artifact, InstallLayout, InstalledPackage, PackageName};
use tracing::{debug, error, info};

use crate::system::SystemFs;

/// Places a built artifact into the install layout:
///
/// 1. mark the artifact executable,
/// 2. copy it to `bin_dir/<artifact file name>`,
/// 3. create `share_dir/<package>/`,
/// 4. copy it into that directory.
///
/// Each step fails on its own and nothing is rolled back; a half-installed
/// package is cleaned up by [`crate::uninstall::remove_package`].
pub fn install_artifact<F>(
    fs: &F,
    layout: &InstallLayout,
    artifact: &Artifact,
    package: &PackageName,
) -> Result<InstalledPackage>
where
    F: SystemFs + ?Sized,
{
    let file_name = artifact.file_name().ok_or_else(|| {
        FshareError::InstallError(format!(
            "Artifact path has no file name: {}",
            artifact.path.display()
        ))
    })?;
    let binary = layout.binary_path(file_name);
    let package_dir = layout.package_dir(package.as_str());
    let mirrored = package_dir.join(file_name);

    debug!(
        "Installing {} as {} (mirror {})",
        artifact.path.display(),
        binary.display(),
        mirrored.display()
    );

    step(format!("chmod +x {}", artifact.path.display()), || {
        fs.set_executable(&artifact.path)
    })?;
    step(format!("mkdir -p {}", layout.bin_dir.display()), || {
        fs.create_dir_all(&layout.bin_dir)
    })?;
    step(
        format!("cp {} {}", artifact.path.display(), binary.display()),
        || fs.copy_file(&artifact.path, &binary),
    )?;
    step(format!("mkdir -p {}", package_dir.display()), || {
        fs.create_dir_all(&package_dir)
    })?;
    step(
        format!("cp {} {}", artifact.path.display(), mirrored.display()),
        || fs.copy_file(&artifact.path, &mirrored),
    )?;

    info!("Installed as '{}'", file_name);
    Ok(InstalledPackage {
        name: package.to_string(),
        binary,
        package_dir,
        mirrored,
    })
}

fn step(operation: String, run: impl FnOnce() -> Result<()>) -> Result<()> {
    run().map_err(|e| {
        error!("Command failed: {}: {}", operation, e);
        FshareError::InstallError(format!("{operation}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;
    use crate::system::HostFs;

    /// Delegates to the host but refuses to write below `deny`.
    struct DenyingFs {
        inner: HostFs,
        deny: std::path::PathBuf,
        copies: Mutex<usize>,
    }

    impl SystemFs for DenyingFs {
        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }
        fn set_executable(&self, path: &Path) -> Result<()> {
            self.inner.set_executable(path)
        }
        fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
            if to.starts_with(&self.deny) {
                return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into());
            }
            *self.copies.lock().unwrap() += 1;
            self.inner.copy_file(from, to)
        }
        fn create_dir_all(&self, path: &Path) -> Result<()> {
            self.inner.create_dir_all(path)
        }
        fn remove_path(&self, path: &Path) -> Result<bool> {
            self.inner.remove_path(path)
        }
    }

    fn fixture() -> (TempDir, InstallLayout, Artifact) {
        let dir = TempDir::new().unwrap();
        let layout = InstallLayout::new(dir.path().join("bin"), dir.path().join("share"));
        let artifact_path = dir.path().join("ws/tool");
        std::fs::create_dir_all(artifact_path.parent().unwrap()).unwrap();
        std::fs::write(&artifact_path, b"\x7fELF").unwrap();
        (dir, layout, Artifact::new(artifact_path))
    }

    #[test]
    fn copies_to_bin_and_share() {
        let (_dir, layout, artifact) = fixture();
        let pkg = PackageName::parse("tool").unwrap();

        let installed = install_artifact(&HostFs::default(), &layout, &artifact, &pkg).unwrap();

        assert_eq!(installed.binary, layout.bin_dir.join("tool"));
        assert_eq!(installed.mirrored, layout.share_dir.join("tool/tool"));
        assert_eq!(std::fs::read(&installed.binary).unwrap(), b"\x7fELF");
        assert!(installed.mirrored.is_file());
    }

    #[test]
    fn reinstall_overwrites() {
        let (_dir, layout, artifact) = fixture();
        let pkg = PackageName::parse("tool").unwrap();
        install_artifact(&HostFs::default(), &layout, &artifact, &pkg).unwrap();
        std::fs::write(&artifact.path, b"v2").unwrap();

        let installed = install_artifact(&HostFs::default(), &layout, &artifact, &pkg).unwrap();

        assert_eq!(std::fs::read(&installed.binary).unwrap(), b"v2");
        assert_eq!(std::fs::read(&installed.mirrored).unwrap(), b"v2");
    }

    #[test]
    fn failed_mirror_leaves_partial_install() {
        let (_dir, layout, artifact) = fixture();
        let pkg = PackageName::parse("tool").unwrap();
        let fs = DenyingFs {
            inner: HostFs::new(false),
            deny: layout.share_dir.clone(),
            copies: Mutex::new(0),
        };

        let err = install_artifact(&fs, &layout, &artifact, &pkg).unwrap_err();

        assert!(matches!(err, FshareError::InstallError(ref msg) if msg.starts_with("cp ")));
        assert_eq!(*fs.copies.lock().unwrap(), 1);
        assert!(layout.bin_dir.join("tool").is_file());
        assert!(!layout.share_dir.join("tool/tool").exists());
    }
}
