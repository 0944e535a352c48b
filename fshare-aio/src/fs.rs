/*
File: fshare-aio/src/fs.rs
Purpose: Primitive synchronous filesystem operations.
*/
use std::{
    fs::{self, Permissions},
    io::{self, Write},
    path::Path,
    sync::Arc,
};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use fshare_common::error::{FshareError, Result};
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

/// Checks if a path exists without following symlinks.
pub fn check_symlink_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Creates a directory and all its parent components if they are missing.
pub fn create_dir_all(path: &Path) -> Result<()> {
    debug!("Creating directory recursively: {}", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed create dir {}: {}", path.display(), e);
        FshareError::from(e)
    })
}

/// Removes a file or symlink.
pub fn remove_file(path: &Path) -> Result<()> {
    debug!("Removing file: {}", path.display());
    fs::remove_file(path).map_err(|e| {
        if e.kind() != io::ErrorKind::NotFound {
            error!("Failed remove file {}: {}", path.display(), e);
        }
        FshareError::from(e)
    })
}

/// Removes a directory and all its contents recursively.
pub fn remove_directory_recursive(path: &Path) -> Result<()> {
    debug!("Removing directory recursively: {}", path.display());
    fs::remove_dir_all(path).map_err(|e| {
        if e.kind() != io::ErrorKind::NotFound {
            error!("Failed remove dir_all {}: {}", path.display(), e);
        }
        FshareError::from(e)
    })
}

/// Removes whatever lives at `path`. Directories are removed recursively,
/// symlinks are unlinked rather than followed. Returns `false` if nothing was
/// there.
pub fn remove_path(path: &Path) -> Result<bool> {
    match path.symlink_metadata() {
        Ok(metadata) => {
            if metadata.file_type().is_dir() {
                remove_directory_recursive(path)?;
            } else {
                remove_file(path)?;
            }
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Path not found (already removed?): {}", path.display());
            Ok(false)
        }
        Err(e) => Err(FshareError::from(e)),
    }
}

/// Copies a regular file, overwriting the destination.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    debug!("Copying {} -> {}", from.display(), to.display());
    fs::copy(from, to).map_err(|e| {
        error!("Failed copy {} -> {}: {}", from.display(), to.display(), e);
        FshareError::from(e)
    })
}

/// Sets file permissions (Unix only). Mode is standard Unix octal mode.
#[cfg(unix)]
pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    debug!("Setting permissions on {}: {:o}", path.display(), mode);
    fs::set_permissions(path, Permissions::from_mode(mode)).map_err(|e| {
        error!("Failed set permissions on {}: {}", path.display(), e);
        FshareError::from(e)
    })
}

#[cfg(not(unix))]
pub fn set_permissions(path: &Path, _mode: u32) -> Result<()> {
    warn!(
        "Setting permissions not fully supported on this platform: {}",
        path.display()
    );
    Ok(())
}

/// Returns true if the directory has no entries. A missing directory counts
/// as empty.
pub fn is_dir_empty(path: &Path) -> Result<bool> {
    match fs::read_dir(path) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(FshareError::from(e)),
    }
}

/// Atomically writes data to a file using a temporary file in the same
/// directory.
pub fn atomic_write_file(original_path: &Path, content: &[u8]) -> Result<()> {
    let dir = original_path.parent().ok_or_else(|| {
        FshareError::IoError(format!(
            "Cannot get parent directory for {}",
            original_path.display()
        ))
    })?;

    create_dir_all(dir)?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    let temp_path = temp_file.path().to_path_buf();

    debug!(
        "Atomically writing {} bytes to {} via temp file {}",
        content.len(),
        original_path.display(),
        temp_path.display()
    );

    temp_file.write_all(content)?;
    temp_file.flush()?;
    temp_file.as_file().sync_all()?;

    temp_file.persist(original_path).map_err(|e| {
        error!(
            "Failed to persist temporary file {} over {}: {}",
            temp_path.display(),
            original_path.display(),
            e.error
        );
        FshareError::Io(Arc::new(e.error))
    })?;

    // NamedTempFile is created 0600; downloaded payloads should be readable.
    if cfg!(unix) {
        if let Err(e) = set_permissions(original_path, 0o644) {
            warn!(
                "Failed to set default permissions on new file {}: {}",
                original_path.display(),
                e
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn remove_path_reports_absence() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(!remove_path(&missing).unwrap());
    }

    #[test]
    fn remove_path_handles_files_and_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file");
        let nested = dir.path().join("nested/inner");
        fs::write(&file, b"x").unwrap();
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("f"), b"y").unwrap();

        assert!(remove_path(&file).unwrap());
        assert!(remove_path(&dir.path().join("nested")).unwrap());
        assert!(!file.exists());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn atomic_write_creates_parent_and_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("sub/payload.bin");
        atomic_write_file(&target, b"hello").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"hello");
    }

    #[test]
    fn is_dir_empty_treats_missing_as_empty() {
        let dir = TempDir::new().unwrap();
        assert!(is_dir_empty(&dir.path().join("nope")).unwrap());
        assert!(is_dir_empty(dir.path()).unwrap());
        fs::write(dir.path().join("a"), b"").unwrap();
        assert!(!is_dir_empty(dir.path()).unwrap());
    }
}
