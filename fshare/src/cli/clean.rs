use clap::Args;
use fshare_common::error::Result;

use crate::cli::HostPipeline;

#[derive(Args, Debug)]
pub struct Clean;

impl Clean {
    pub fn run(&self, pipeline: &HostPipeline) -> Result<()> {
        println!("Cleaning {}...", pipeline.workspace().path().display());
        pipeline.reset_workspace()
    }
}
