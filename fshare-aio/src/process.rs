// fshare-aio/src/process.rs
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use fshare_common::error::{FshareError, Result};
use tokio::process::Command;
use tracing::{debug, error};

/// A fully described external command.
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn display_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Asynchronously runs an external command with inherited stdout/stderr and
/// returns its exit status. With `timeout` set, the child is killed once the
/// deadline passes and [`FshareError::ToolchainTimeout`] is returned; without
/// it the call waits for as long as the child runs.
pub async fn run_command_status_async(
    spec: &CommandSpec,
    timeout: Option<Duration>,
) -> Result<ExitStatus> {
    debug!(
        "Async Running command: {} (cwd: {:?})",
        spec.display_line(),
        spec.cwd
    );

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    cmd.kill_on_drop(true);
    if let Some(dir) = &spec.cwd {
        cmd.current_dir(dir);
    }
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());
    cmd.stdin(Stdio::null()); // Prevent hanging on stdin

    let mut child = cmd.spawn().map_err(|e| {
        error!("Async Failed to execute command {}: {}", spec.display_line(), e);
        FshareError::CommandExecError(format!("{}: {e}", spec.display_line()))
    })?;

    let status = match timeout {
        None => child.wait().await,
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(waited) => waited,
            Err(_) => {
                error!(
                    "Async Command exceeded {}s, killing: {}",
                    limit.as_secs(),
                    spec.display_line()
                );
                if let Err(e) = child.kill().await {
                    debug!("Failed to kill timed out child: {}", e);
                }
                return Err(FshareError::ToolchainTimeout {
                    command: spec.display_line(),
                    secs: limit.as_secs(),
                });
            }
        },
    }
    .map_err(|e| FshareError::Io(Arc::new(e)))?;

    if status.success() {
        debug!("Async Command finished successfully.");
    } else {
        debug!("Async Command failed with status: {}", status);
    }
    Ok(status)
}
