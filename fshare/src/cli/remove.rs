use std::path::Path;

use clap::Args;
use colored::Colorize;
use fshare_common::error::Result;
use fshare_common::model::PackageName;
use fshare_core::PathState;
use tracing::{debug, warn};

use crate::cli::HostPipeline;

#[derive(Args, Debug)]
pub struct Remove {
    /// Package to remove, as name or owner/name
    pub name: String,
}

impl Remove {
    pub fn run(&self, pipeline: &HostPipeline) -> Result<()> {
        let package = PackageName::parse(&self.name)?;
        let layout = pipeline.layout();

        let (mut file_count, mut size_bytes) = (0, 0);
        for path in [
            layout.binary_path(package.as_str()),
            layout.package_dir(package.as_str()),
        ] {
            let (files, size) = count_files_and_size(&path);
            file_count += files;
            size_bytes += size;
        }

        println!("Removing {package}...");
        let report = pipeline.remove(&package)?;
        debug!("Removal report: {:?}", report);

        for state in [&report.binary, &report.package_dir] {
            if let PathState::Absent(path) = state {
                println!("  {} not found", path.display());
            }
        }

        if report.nothing_removed() {
            println!("{} {} is not installed", "Warning:".yellow(), package.as_str().cyan());
        } else {
            println!(
                "✓ Removed {} ({} files, {})",
                package.as_str().green(),
                file_count,
                format_size(size_bytes)
            );
        }
        Ok(())
    }
}

fn count_files_and_size(path: &Path) -> (usize, u64) {
    let mut file_count = 0;
    let mut total_size = 0;
    for entry in walkdir::WalkDir::new(path) {
        match entry {
            Ok(entry) => {
                let file_type = entry.file_type();
                if !(file_type.is_file() || file_type.is_symlink()) {
                    continue;
                }
                file_count += 1;
                if file_type.is_file() {
                    match entry.metadata() {
                        Ok(metadata) => total_size += metadata.len(),
                        Err(e) => warn!(
                            "Could not get metadata for {}: {}",
                            entry.path().display(),
                            e
                        ),
                    }
                }
            }
            // Missing paths are reported by the removal itself.
            Err(e) if e.io_error().is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound) => {}
            Err(e) => warn!("Error traversing {}: {}", path.display(), e),
        }
    }
    (file_count, total_size)
}

fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    if size >= GB {
        format!("{:.1}GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.1}MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.1}KB", size as f64 / KB as f64)
    } else {
        format!("{size}B")
    }
}
