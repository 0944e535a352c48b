// fshare-common/src/config.rs
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use super::error::{FshareError, Result};
use super::model::InstallLayout;

const DEFAULT_BASE_URL: &str = "https://quanthai.net/repos";
const DEFAULT_WORKSPACE: &str = "/tmp/fsdl";
const DEFAULT_BIN_DIR: &str = "/usr/local/bin";
const DEFAULT_SHARE_DIR: &str = "/usr/share";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub workspace_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub share_dir: PathBuf,
    pub http_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    /// `None` lets external toolchains run for as long as they like.
    pub toolchain_timeout: Option<Duration>,
    pub use_sudo: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading fshare configuration");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup. `load` uses the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let base_url = get("FSHARE_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let workspace_dir = get("FSHARE_WORKSPACE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKSPACE));
        let bin_dir = get("FSHARE_BIN_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BIN_DIR));
        let share_dir = get("FSHARE_SHARE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SHARE_DIR));

        let http_timeout = parse_secs("FSHARE_HTTP_TIMEOUT_SECS", get("FSHARE_HTTP_TIMEOUT_SECS"))?
            .or(Some(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)));
        let connect_timeout =
            parse_secs("FSHARE_CONNECT_TIMEOUT_SECS", get("FSHARE_CONNECT_TIMEOUT_SECS"))?
                .or(Some(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)));
        let toolchain_timeout = parse_secs(
            "FSHARE_TOOLCHAIN_TIMEOUT_SECS",
            get("FSHARE_TOOLCHAIN_TIMEOUT_SECS"),
        )?;
        let use_sudo = get("FSHARE_NO_SUDO").is_none();

        debug!("Base URL: {}", base_url);
        debug!("Workspace: {}", workspace_dir.display());
        debug!(
            "Install layout: bin={} share={}",
            bin_dir.display(),
            share_dir.display()
        );
        debug!("Configuration loaded successfully.");

        Ok(Self {
            base_url,
            workspace_dir,
            bin_dir,
            share_dir,
            http_timeout,
            connect_timeout,
            toolchain_timeout,
            use_sudo,
        })
    }

    pub fn layout(&self) -> InstallLayout {
        InstallLayout::new(self.bin_dir.clone(), self.share_dir.clone())
    }
}

fn parse_secs(key: &str, value: Option<String>) -> Result<Option<Duration>> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|e| FshareError::Config(format!("{key}='{raw}' is not a number of seconds: {e}"))),
    }
}
