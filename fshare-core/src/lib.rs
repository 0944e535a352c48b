// fshare-core/src/lib.rs

pub mod build;
pub mod detect;
pub mod install;
pub mod pipeline;
pub mod script;
pub mod system;
pub mod uninstall;
pub mod workspace;

// Re-export key types for easier use by the CLI crate
pub use build::toolchain::{HostToolchain, Invocation, ToolStatus, Toolchain};
pub use pipeline::{GetOptions, GetOutcome, Pipeline};
pub use system::{HostFs, SystemFs};
pub use uninstall::{PathState, RemovalReport};
pub use workspace::Workspace;
