// fshare-core/src/build/toolchain.rs
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use async_trait::async_trait;
use fshare_aio::process::{run_command_status_async, CommandSpec};
use fshare_common::error::{FshareError, Result};
use tracing::{debug, error};

/// One external command, run synchronously in `cwd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Exit status of an invocation. `code` is `None` when the process was
/// terminated by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    code: Option<i32>,
}

impl ToolStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn signalled() -> Self {
        Self { code: None }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ToolStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Runs external build tools. Only the exit status is reported back.
#[async_trait]
pub trait Toolchain: Send + Sync {
    async fn invoke(&self, invocation: &Invocation) -> Result<ToolStatus>;
}

/// Runs tools on the host. Programs without a path separator are looked up
/// on `PATH`; everything else is resolved against the invocation's `cwd`.
#[derive(Debug, Clone, Default)]
pub struct HostToolchain {
    timeout: Option<Duration>,
}

impl HostToolchain {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn resolve(&self, invocation: &Invocation) -> Result<PathBuf> {
        let program = Path::new(&invocation.program);
        if invocation.program.contains('/') {
            if program.is_absolute() {
                return Ok(program.to_path_buf());
            }
            // The child is spawned in `cwd`, so hand it an absolute path.
            return std::path::absolute(invocation.cwd.join(program)).map_err(|e| {
                FshareError::CommandExecError(format!(
                    "cannot resolve '{}' in {}: {e}",
                    invocation.program,
                    invocation.cwd.display()
                ))
            });
        }
        which::which(&invocation.program).map_err(|e| {
            FshareError::CommandExecError(format!(
                "'{}' not found on PATH: {e}",
                invocation.program
            ))
        })
    }
}

#[async_trait]
impl Toolchain for HostToolchain {
    async fn invoke(&self, invocation: &Invocation) -> Result<ToolStatus> {
        let program = self.resolve(invocation)?;
        debug!("Resolved {} to {}", invocation.program, program.display());
        let spec = CommandSpec {
            program,
            args: invocation.args.clone(),
            cwd: Some(invocation.cwd.clone()),
        };
        let status = run_command_status_async(&spec, self.timeout).await?;
        Ok(status.into())
    }
}

/// Invokes a tool and turns any non-zero status into
/// [`FshareError::ToolchainFailure`].
pub async fn run_checked<T>(toolchain: &T, invocation: &Invocation) -> Result<()>
where
    T: Toolchain + ?Sized,
{
    let status = toolchain.invoke(invocation).await?;
    if status.success() {
        return Ok(());
    }
    error!("Command failed: {} ({})", invocation, status);
    Err(FshareError::ToolchainFailure {
        command: invocation.to_string(),
        status: status.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_displays_as_command_line() {
        let inv = Invocation::new("go", Path::new("/tmp/ws")).args(["build", "-o", "tool", "main.go"]);
        assert_eq!(inv.to_string(), "go build -o tool main.go");
    }

    #[test]
    fn status_success_requires_zero() {
        assert!(ToolStatus::from_code(0).success());
        assert!(!ToolStatus::from_code(2).success());
        assert!(!ToolStatus::signalled().success());
        assert_eq!(ToolStatus::from_code(2).to_string(), "exit code 2");
    }

    #[test]
    fn relative_programs_resolve_against_cwd() {
        let host = HostToolchain::default();
        let inv = Invocation::new("./install.sh", Path::new("/tmp/ws"));
        assert_eq!(host.resolve(&inv).unwrap(), PathBuf::from("/tmp/ws/install.sh"));
    }

    #[test]
    fn relative_cwd_resolves_to_absolute_program() {
        let host = HostToolchain::default();
        let inv = Invocation::new("./install.sh", Path::new("fsdl"));
        let resolved = host.resolve(&inv).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(
            resolved,
            std::env::current_dir().unwrap().join("fsdl/install.sh")
        );
    }

    #[test]
    fn unknown_program_is_exec_error() {
        let host = HostToolchain::default();
        let inv = Invocation::new("fshare-no-such-compiler", Path::new("/"));
        assert!(matches!(
            host.resolve(&inv),
            Err(FshareError::CommandExecError(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn host_toolchain_reports_exit_codes() {
        let host = HostToolchain::default();
        let ok = Invocation::new("sh", Path::new("/")).args(["-c", "exit 0"]);
        let bad = Invocation::new("sh", Path::new("/")).args(["-c", "exit 4"]);
        assert!(host.invoke(&ok).await.unwrap().success());
        let err = run_checked(&host, &bad).await.unwrap_err();
        assert!(matches!(err, FshareError::ToolchainFailure { .. }));
    }
}
