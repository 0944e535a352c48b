// src/model/mod.rs
// Declares the modules within the model directory.

pub mod artifact;
pub mod candidate;
pub mod repo;
pub mod strategy;

// Re-export
pub use artifact::{Artifact, InstallLayout, InstalledPackage};
pub use candidate::CandidateFile;
pub use repo::{PackageName, RepoRef};
pub use strategy::{BuildStrategy, NativeLanguage};
