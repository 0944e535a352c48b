// fshare-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;

// Re-export key types
pub use config::Config;
pub use error::{FshareError, Result};
pub use model::{
    Artifact, BuildStrategy, CandidateFile, InstallLayout, InstalledPackage, PackageName, RepoRef,
};
