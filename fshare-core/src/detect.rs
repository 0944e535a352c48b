// fshare-core/src/detect.rs
use fshare_common::model::BuildStrategy;
use tracing::{debug, info};

use crate::workspace::Workspace;

/// Picks the build strategy from the marker files at the workspace root.
/// Markers are checked in [`BuildStrategy::PRIORITY`] order and the first
/// one present decides; later markers are ignored.
pub fn detect(workspace: &Workspace) -> BuildStrategy {
    for strategy in BuildStrategy::PRIORITY {
        let Some(marker) = strategy.marker() else {
            continue;
        };
        if workspace.join(marker).is_file() {
            info!("Detected {} app ({})", strategy, marker);
            return strategy;
        }
        debug!("No {} in {}", marker, workspace.path().display());
    }
    BuildStrategy::Unknown
}

#[cfg(test)]
mod tests {
    use fshare_common::model::NativeLanguage;
    use tempfile::TempDir;

    use super::*;

    fn workspace_with(files: &[&str]) -> (TempDir, Workspace) {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        for file in files {
            std::fs::write(ws.join(file), b"").unwrap();
        }
        (dir, ws)
    }

    #[test]
    fn empty_workspace_is_unknown() {
        let (_dir, ws) = workspace_with(&[]);
        assert_eq!(detect(&ws), BuildStrategy::Unknown);
    }

    #[test]
    fn each_marker_maps_to_its_strategy() {
        let cases = [
            ("main.py", BuildStrategy::Python),
            ("main.go", BuildStrategy::Go),
            ("main.cpp", BuildStrategy::Native(NativeLanguage::Cpp)),
            ("main.c", BuildStrategy::Native(NativeLanguage::C)),
            ("Makefile", BuildStrategy::Makefile),
        ];
        for (marker, expected) in cases {
            let (_dir, ws) = workspace_with(&[marker]);
            assert_eq!(detect(&ws), expected, "marker {marker}");
        }
    }

    #[test]
    fn earlier_marker_wins_when_several_coexist() {
        let (_dir, ws) = workspace_with(&["Makefile", "main.go", "main.py"]);
        assert_eq!(detect(&ws), BuildStrategy::Python);

        let (_dir, ws) = workspace_with(&["Makefile", "main.cpp", "main.go"]);
        assert_eq!(detect(&ws), BuildStrategy::Go);

        let (_dir, ws) = workspace_with(&["Makefile", "main.cpp"]);
        assert_eq!(detect(&ws), BuildStrategy::Native(NativeLanguage::Cpp));
    }

    #[test]
    fn directories_named_like_markers_are_ignored() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        std::fs::create_dir(ws.join("main.go")).unwrap();
        assert_eq!(detect(&ws), BuildStrategy::Unknown);
    }
}
