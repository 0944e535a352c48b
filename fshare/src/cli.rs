// fshare/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Parser, Subcommand};
use fshare_common::error::Result;
use fshare_core::{HostFs, HostToolchain, Pipeline};

pub mod clean;
pub mod get;
pub mod remove;

use crate::cli::clean::Clean;
use crate::cli::get::Get;
use crate::cli::remove::Remove;

/// The pipeline as wired for the host system.
pub type HostPipeline = Pipeline<HostToolchain, HostFs>;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "fshare", bin_name = "fshare")]
#[command(propagate_version = true, arg_required_else_help = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download, build and install a package from the repository
    Get(Get),
    /// Remove an installed package
    Remove(Remove),
    /// Delete the download workspace
    Clean(Clean),
}

impl Command {
    pub async fn run(&self, pipeline: &HostPipeline) -> Result<()> {
        match self {
            Self::Get(command) => command.run(pipeline).await,
            Self::Remove(command) => command.run(pipeline),
            Self::Clean(command) => command.run(pipeline),
        }
    }
}
