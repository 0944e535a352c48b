// fshare/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use fshare_common::config::Config;
use fshare_core::Pipeline;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::CliArgs;

fn init_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("FSHARE_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

#[tokio::main]
async fn main() {
    // Usage errors exit with 1; help and version go to stdout and exit with 0.
    let cli_args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(cli_args.verbose);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: Could not load config: {}", "Error".red().bold(), e);
            process::exit(1);
        }
    };

    let result = match Pipeline::from_config(&config) {
        Ok(pipeline) => cli_args.command.run(&pipeline).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }

    debug!("Command completed successfully.");
}
