// fshare-aio/src/extract.rs
// Handles archive extraction asynchronously.

use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use fshare_common::error::{FshareError, Result};
use tokio::fs;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Asynchronously extracts an archive into `target_dir`. The archive type is
/// inferred from the extension; only zip payloads are supported.
///
/// Anything wrong with the payload itself (not a zip, truncated, unsafe entry
/// paths) is reported as [`FshareError::BadArchive`].
pub async fn extract_archive_async(archive_path: &Path, target_dir: &Path) -> Result<()> {
    let archive_type = archive_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    debug!(
        "Async Extracting archive '{}' (type: {}) to '{}'",
        archive_path.display(),
        archive_type,
        target_dir.display()
    );

    if archive_type != "zip" {
        return Err(FshareError::BadArchive(
            archive_path.to_path_buf(),
            format!("unsupported archive type '{archive_type}'"),
        ));
    }

    fs::create_dir_all(target_dir).await?;

    // The zip crate needs Read + Seek, so the payload is read into memory and
    // unpacked on the blocking pool.
    let zip_bytes = fs::read(archive_path).await?;
    let archive_path = archive_path.to_path_buf();
    let target_dir = target_dir.to_path_buf();
    tokio::task::spawn_blocking(move || unpack_zip(zip_bytes, &archive_path, &target_dir))
        .await
        .map_err(|e| FshareError::Generic(format!("JoinError in ZIP extraction: {e}")))?
}

fn unpack_zip(zip_bytes: Vec<u8>, archive_path: &Path, target_dir: &Path) -> Result<()> {
    let bad = |reason: String| FshareError::BadArchive(archive_path.to_path_buf(), reason);

    let mut archive =
        ZipArchive::new(Cursor::new(zip_bytes)).map_err(|e| bad(format!("failed to open: {e}")))?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| bad(format!("failed to read entry {i}: {e}")))?;
        let outpath = safe_entry_path(target_dir, file.name())
            .ok_or_else(|| bad(format!("unsafe entry path '{}'", file.name())))?;

        if file.is_dir() {
            std::fs::create_dir_all(&outpath)?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = std::fs::File::create(&outpath)?;
        std::io::copy(&mut file, &mut outfile)
            .map_err(|e| bad(format!("failed to inflate '{}': {e}", file.name())))?;

        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            if let Err(e) = crate::fs::set_permissions(&outpath, mode & 0o7777) {
                warn!(
                    "Failed set permissions on ZIP entry {}: {}",
                    outpath.display(),
                    e
                );
            }
        }
        debug!("Extracted ZIP entry to: {}", outpath.display());
    }

    debug!("Finished ZIP extraction for {}", archive_path.display());
    Ok(())
}

/// Joins an entry name onto `target_dir`, refusing absolute paths and `..`.
fn safe_entry_path(target_dir: &Path, entry_name: &str) -> Option<PathBuf> {
    let mut out = target_dir.to_path_buf();
    for comp in Path::new(entry_name).components() {
        match comp {
            Component::Normal(p) => out.push(p),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if out == target_dir {
        return None;
    }
    Some(out)
}
