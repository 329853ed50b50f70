//! tinyagent binary entry point.

use clap::Parser;
use std::process::ExitCode;
use tinyagent_cli::{Cli, cmd};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = Cli::parse().run().await;
    cmd::exit_code(result, &mut std::io::stderr())
}
