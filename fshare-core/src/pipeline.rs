// fshare-core/src/pipeline.rs
use fshare_aio::extract::extract_archive_async;
use fshare_common::config::Config;
use fshare_common::error::{FshareError, Result};
use fshare_common::model::{
    BuildStrategy, CandidateFile, InstallLayout, InstalledPackage, PackageName, RepoRef,
};
use fshare_net::RepoClient;
use tracing::{debug, info, instrument, warn};

use crate::build::toolchain::{HostToolchain, Toolchain};
use crate::system::{HostFs, SystemFs};
use crate::uninstall::RemovalReport;
use crate::workspace::Workspace;
use crate::{build, detect, install, script, uninstall};

#[derive(Debug, Clone, Copy, Default)]
pub struct GetOptions {
    /// Stop after fetching: no extraction, detection, build or install.
    pub no_unzip: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetOutcome {
    Installed(InstalledPackage),
    /// `install.sh` was fetched and ran successfully.
    ScriptRan,
    FetchedOnly { retrieved: Vec<CandidateFile> },
    /// The build ran but has no single output to install (Makefile).
    BuiltWithoutArtifact { strategy: BuildStrategy },
    /// No marker file was recognised.
    NoStrategy,
    /// The build succeeded but its expected output is missing.
    MissingArtifact { strategy: BuildStrategy },
}

/// Fetch → detect → build → install, plus removal and workspace cleanup.
pub struct Pipeline<T: Toolchain, F: SystemFs> {
    client: RepoClient,
    workspace: Workspace,
    layout: InstallLayout,
    toolchain: T,
    fs: F,
}

impl Pipeline<HostToolchain, HostFs> {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            RepoClient::new(config)?,
            Workspace::new(&config.workspace_dir),
            config.layout(),
            HostToolchain::new(config.toolchain_timeout),
            HostFs::new(config.use_sudo),
        ))
    }
}

impl<T: Toolchain, F: SystemFs> Pipeline<T, F> {
    pub fn new(
        client: RepoClient,
        workspace: Workspace,
        layout: InstallLayout,
        toolchain: T,
        fs: F,
    ) -> Self {
        Self {
            client,
            workspace,
            layout,
            toolchain,
            fs,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    #[instrument(skip(self, repo, options), fields(repo = %repo))]
    pub async fn fetch_and_install(
        &self,
        repo: &RepoRef,
        options: &GetOptions,
    ) -> Result<GetOutcome> {
        self.workspace.reset()?;
        self.workspace.ensure()?;

        let retrieved = self
            .client
            .fetch(repo, self.workspace.path())
            .await
            .into_retrieved()?;
        debug!("Retrieved {:?}", retrieved.candidates());

        // Raw downloads only: install.sh is left unexecuted as well.
        if options.no_unzip {
            info!("Skipping extraction (--no-unzip)");
            return Ok(GetOutcome::FetchedOnly {
                retrieved: retrieved.candidates(),
            });
        }

        // An install script overrides detection and build.
        if retrieved.contains(CandidateFile::InstallScript) {
            return self.delegate_to_script().await;
        }

        for (candidate, path) in retrieved.archives() {
            match extract_archive_async(path, self.workspace.path()).await {
                Ok(()) => info!("Extracted {}", candidate),
                Err(e) => warn!("Bad ZIP file: {} ({})", candidate, e),
            }
        }

        info!("Using automatic language detection...");
        let strategy = detect::detect(&self.workspace);
        let package = repo.package_name();
        let artifact = build::build(&self.toolchain, &self.workspace, strategy, &package).await?;

        match (strategy, artifact) {
            (BuildStrategy::Unknown, _) => Ok(GetOutcome::NoStrategy),
            (_, Some(artifact)) => {
                let installed =
                    install::install_artifact(&self.fs, &self.layout, &artifact, &package)?;
                self.workspace.reset()?;
                Ok(GetOutcome::Installed(installed))
            }
            (strategy, None) if strategy.produces_artifact() => {
                Ok(GetOutcome::MissingArtifact { strategy })
            }
            (strategy, None) => Ok(GetOutcome::BuiltWithoutArtifact { strategy }),
        }
    }

    /// The workspace is cleared whether or not the script succeeds; a
    /// failing script is reported afterwards.
    async fn delegate_to_script(&self) -> Result<GetOutcome> {
        let result = script::run_install_script(&self.toolchain, &self.fs, &self.workspace).await;
        let cleared = self.workspace.reset();

        let status = result?;
        if !status.success() {
            if let Err(e) = cleared {
                warn!("Failed to clear workspace after install.sh: {}", e);
            }
            return Err(FshareError::ScriptFailure(status.to_string()));
        }
        cleared?;
        Ok(GetOutcome::ScriptRan)
    }

    pub fn remove(&self, package: &PackageName) -> Result<RemovalReport> {
        uninstall::remove_package(&self.fs, &self.layout, package)
    }

    pub fn reset_workspace(&self) -> Result<()> {
        self.workspace.reset()?;
        info!("Cleaning complete");
        Ok(())
    }
}
