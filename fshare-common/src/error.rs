use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FshareError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("HttpError: {0}")]
    HttpError(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid repository reference '{0}': expected <owner>/<name>")]
    InvalidRepoRef(String),

    #[error("Invalid package name '{0}'")]
    InvalidPackageName(String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    DownloadError(String, String, String),

    #[error("Bad archive {}: {}", .0.display(), .1)]
    BadArchive(PathBuf, String),

    #[error("Command failed: {command} ({status})")]
    ToolchainFailure { command: String, status: String },

    #[error("Command timed out after {secs}s: {command}")]
    ToolchainTimeout { command: String, secs: u64 },

    #[error("install.sh exited with {0}")]
    ScriptFailure(String),

    #[error("Failed to execute command: {0}")]
    CommandExecError(String),

    #[error("Installation Error: {0}")]
    InstallError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("IoError: {0}")]
    IoError(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for FshareError {
    fn from(err: std::io::Error) -> Self {
        FshareError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for FshareError {
    fn from(err: reqwest::Error) -> Self {
        FshareError::Http(Arc::new(err))
    }
}

impl FshareError {
    /// True for an I/O error whose kind is `PermissionDenied`.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, FshareError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    }
}

pub type Result<T> = std::result::Result<T, FshareError>;
