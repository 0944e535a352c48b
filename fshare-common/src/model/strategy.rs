// fshare-common/src/model/strategy.rs
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeLanguage {
    Cpp,
    C,
}

/// Toolchain family selected from the marker files present in a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStrategy {
    /// `main.py`, packaged into a single executable with PyInstaller.
    Python,
    Go,
    Native(NativeLanguage),
    /// A `Makefile` is expected to install whatever it builds.
    Makefile,
    Unknown,
}

impl BuildStrategy {
    /// Detection order. The first marker found wins.
    pub const PRIORITY: [BuildStrategy; 5] = [
        BuildStrategy::Python,
        BuildStrategy::Go,
        BuildStrategy::Native(NativeLanguage::Cpp),
        BuildStrategy::Native(NativeLanguage::C),
        BuildStrategy::Makefile,
    ];

    pub fn marker(self) -> Option<&'static str> {
        match self {
            BuildStrategy::Python => Some("main.py"),
            BuildStrategy::Go => Some("main.go"),
            BuildStrategy::Native(NativeLanguage::Cpp) => Some("main.cpp"),
            BuildStrategy::Native(NativeLanguage::C) => Some("main.c"),
            BuildStrategy::Makefile => Some("Makefile"),
            BuildStrategy::Unknown => None,
        }
    }

    /// Whether a successful build yields a single file to install.
    pub fn produces_artifact(self) -> bool {
        matches!(
            self,
            BuildStrategy::Python | BuildStrategy::Go | BuildStrategy::Native(_)
        )
    }
}

impl fmt::Display for BuildStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BuildStrategy::Python => "Python",
            BuildStrategy::Go => "Go",
            BuildStrategy::Native(NativeLanguage::Cpp) => "C++",
            BuildStrategy::Native(NativeLanguage::C) => "C",
            BuildStrategy::Makefile => "Makefile",
            BuildStrategy::Unknown => "unknown",
        };
        f.write_str(label)
    }
}
