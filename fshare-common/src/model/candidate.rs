// fshare-common/src/model/candidate.rs
use std::fmt;

/// A file probed on the remote during fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CandidateFile {
    MainArchive,
    AppArchive,
    RootArchive,
    InstallScript,
}

impl CandidateFile {
    /// Probe order.
    pub const ALL: [CandidateFile; 4] = [
        CandidateFile::MainArchive,
        CandidateFile::AppArchive,
        CandidateFile::RootArchive,
        CandidateFile::InstallScript,
    ];

    /// Extraction order.
    pub const ARCHIVES: [CandidateFile; 3] = [
        CandidateFile::MainArchive,
        CandidateFile::AppArchive,
        CandidateFile::RootArchive,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            CandidateFile::MainArchive => "main.zip",
            CandidateFile::AppArchive => "app.zip",
            CandidateFile::RootArchive => "root.zip",
            CandidateFile::InstallScript => "install.sh",
        }
    }

    pub fn is_archive(self) -> bool {
        !matches!(self, CandidateFile::InstallScript)
    }
}

impl fmt::Display for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}
