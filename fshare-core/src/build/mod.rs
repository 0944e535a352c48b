// ===== fshare-core/src/build/mod.rs =====
// Turns a detected strategy into toolchain invocations and an artifact path.

use std::env;
use std::path::PathBuf;

use fshare_common::error::Result;
use fshare_common::model::{Artifact, BuildStrategy, NativeLanguage, PackageName};
use tracing::{info, warn};

use crate::workspace::Workspace;

pub mod toolchain;

use toolchain::{run_checked, Invocation, Toolchain};

/// What a strategy runs and which file it is expected to leave behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub steps: Vec<Invocation>,
    pub artifact: Option<PathBuf>,
}

pub fn plan(strategy: BuildStrategy, workspace: &Workspace, package: &PackageName) -> BuildPlan {
    let cwd = workspace.path();
    let name = package.as_str();
    match strategy {
        BuildStrategy::Python => BuildPlan {
            steps: vec![
                Invocation::new("pip", cwd).args(["install", "pyinstaller"]),
                Invocation::new("pyinstaller", cwd).args([
                    "--onefile",
                    "--name",
                    name,
                    "main.py",
                ]),
            ],
            artifact: Some(workspace.join("dist").join(name)),
        },
        BuildStrategy::Go => BuildPlan {
            steps: vec![Invocation::new("go", cwd).args(["build", "-o", name, "main.go"])],
            artifact: Some(workspace.join(name)),
        },
        BuildStrategy::Native(lang) => {
            let source = match lang {
                NativeLanguage::Cpp => "main.cpp",
                NativeLanguage::C => "main.c",
            };
            BuildPlan {
                steps: vec![Invocation::new(native_compiler(lang), cwd).args([source, "-o", name])],
                artifact: Some(workspace.join(name)),
            }
        }
        BuildStrategy::Makefile => BuildPlan {
            steps: vec![Invocation::new("make", cwd)],
            artifact: None,
        },
        BuildStrategy::Unknown => BuildPlan {
            steps: Vec::new(),
            artifact: None,
        },
    }
}

/// `CXX`/`CC` override the default compilers.
fn native_compiler(lang: NativeLanguage) -> String {
    let (var, default) = match lang {
        NativeLanguage::Cpp => ("CXX", "g++"),
        NativeLanguage::C => ("CC", "cc"),
    };
    env::var(var)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Runs every step of the strategy's plan. Any failing step aborts with
/// `ToolchainFailure`. Returns the artifact when the strategy has one and it
/// exists afterwards.
pub async fn build<T>(
    toolchain: &T,
    workspace: &Workspace,
    strategy: BuildStrategy,
    package: &PackageName,
) -> Result<Option<Artifact>>
where
    T: Toolchain + ?Sized,
{
    let plan = plan(strategy, workspace, package);
    if plan.steps.is_empty() {
        warn!(
            "No known entry point found in {}. Inspect it manually or fetch with --no-unzip.",
            workspace.path().display()
        );
        return Ok(None);
    }

    info!("Building {} with {} ...", package, strategy);
    for step in &plan.steps {
        info!("Running {}", step);
        run_checked(toolchain, step).await?;
    }

    match plan.artifact {
        Some(path) if path.is_file() => Ok(Some(Artifact::new(path))),
        Some(path) => {
            warn!(
                "Build succeeded but output binary not found at {}",
                path.display()
            );
            Ok(None)
        }
        None => {
            info!("{} strategy leaves installation to the build itself", strategy);
            Ok(None)
        }
    }
}
