// fshare-aio/src/lib.rs
//! IO operations for fshare (filesystem, archive extraction, process execution)

pub mod extract;
pub mod fs;
pub mod process;

pub use extract::extract_archive_async;
pub use fs::*;
pub use process::{run_command_status_async, CommandSpec};
