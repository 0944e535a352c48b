// fshare-core/src/script.rs
use fshare_common::error::{FshareError, Result};
use fshare_common::model::CandidateFile;
use tracing::{info, warn};

use crate::build::toolchain::{Invocation, ToolStatus, Toolchain};
use crate::system::SystemFs;
use crate::workspace::Workspace;

/// Runs the fetched `install.sh` from inside the workspace, without
/// arguments, and returns its exit status.
pub async fn run_install_script<T, F>(
    toolchain: &T,
    fs: &F,
    workspace: &Workspace,
) -> Result<ToolStatus>
where
    T: Toolchain + ?Sized,
    F: SystemFs + ?Sized,
{
    let script = workspace.join(CandidateFile::InstallScript.file_name());
    if !script.is_file() {
        return Err(FshareError::NotFound(format!(
            "install script missing at {}",
            script.display()
        )));
    }

    info!("Running install.sh ...");
    fs.set_executable(&script)?;

    // Resolved against the invocation's cwd.
    let program = format!("./{}", CandidateFile::InstallScript.file_name());
    let invocation = Invocation::new(program, workspace.path());
    let status = toolchain.invoke(&invocation).await?;
    if !status.success() {
        warn!("install.sh exited with {}", status);
    }
    Ok(status)
}
