use clap::Args;
use colored::Colorize;
use fshare_common::error::Result;
use fshare_common::model::RepoRef;
use fshare_core::{GetOptions, GetOutcome};
use tracing::debug;

use crate::cli::HostPipeline;

#[derive(Args, Debug)]
pub struct Get {
    /// Repository to install, as owner/name
    pub repo: String,

    /// Only download the candidate files; skip extraction, build and install
    #[arg(long)]
    pub no_unzip: bool,
}

impl Get {
    pub async fn run(&self, pipeline: &HostPipeline) -> Result<()> {
        let repo = RepoRef::parse(&self.repo)?;
        let options = GetOptions {
            no_unzip: self.no_unzip,
        };

        println!("{}Fetching {}", "==> ".bold().blue(), repo.to_string().cyan());
        let outcome = pipeline.fetch_and_install(&repo, &options).await?;
        debug!("Outcome for {}: {:?}", repo, outcome);

        match outcome {
            GetOutcome::Installed(installed) => {
                println!(
                    "✓ Installed {} to {}",
                    installed.name.green(),
                    installed.binary.display()
                );
            }
            GetOutcome::ScriptRan => {
                println!("✓ install.sh for {} completed", repo.to_string().green());
            }
            GetOutcome::FetchedOnly { retrieved } => {
                let names: Vec<&str> = retrieved.iter().map(|c| c.file_name()).collect();
                println!(
                    "✓ Downloaded {} into {}",
                    names.join(", "),
                    pipeline.workspace().path().display()
                );
            }
            GetOutcome::BuiltWithoutArtifact { strategy } => {
                println!(
                    "✓ {} build finished; nothing to install (sources left in {})",
                    strategy,
                    pipeline.workspace().path().display()
                );
            }
            GetOutcome::NoStrategy => {
                println!(
                    "{} Could not detect how to build {}. Files left in {}",
                    "Warning:".yellow(),
                    repo,
                    pipeline.workspace().path().display()
                );
            }
            GetOutcome::MissingArtifact { strategy } => {
                println!(
                    "{} {} build produced no output for {}. Nothing installed",
                    "Warning:".yellow(),
                    strategy,
                    repo
                );
            }
        }
        Ok(())
    }
}
