//! Command-line entry: argument parsing and the top-level run.

use crate::{
    bootstrap,
    config::{Config, ConfigError, TOKEN_VAR},
    repl::{ChatRepl, Editor},
};
use anyhow::Result;
use clap::Parser;
use std::{io::Write, process::ExitCode};

/// Minimal tool-calling agent REPL.
///
/// Configured entirely from environment variables, see [`crate::config`].
#[derive(Parser, Debug)]
#[command(name = "tinyagent", version, about = "Minimal tool-calling agent REPL")]
pub struct Cli {}

impl Cli {
    /// Resolve configuration, start the agent and run the REPL.
    ///
    /// Returns a failing exit code for configuration problems. Startup
    /// errors are returned to the caller.
    pub async fn run(self) -> Result<ExitCode> {
        let _ = dotenvy::dotenv();
        let mut out = std::io::stdout();
        let mut err = std::io::stderr();

        let Some(config) = resolve(Config::from_env(), &mut out, &mut err)? else {
            return Ok(ExitCode::FAILURE);
        };

        let mut agent = bootstrap::build(&config)?;
        writeln!(out, "Tiny Agent initialized.")?;
        let result = async {
            bootstrap::start(&mut agent, &config, &mut out, &mut err).await?;
            ChatRepl::new(&mut agent, Editor::new()?)
                .turn_timeout(config.turn_timeout)
                .run(&mut out, &mut err)
                .await
        }
        .await;
        agent.shutdown().await;
        result.map(|()| ExitCode::SUCCESS)
    }
}

/// Accept a resolved configuration, or explain why there is none.
///
/// `None` means the process should exit with a failure status before
/// anything is started.
pub fn resolve(
    config: Result<Config, ConfigError>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<Option<Config>> {
    match config {
        Ok(config) => Ok(Some(config)),
        Err(ConfigError::MissingToken) => {
            write_token_guidance(out, err)?;
            Ok(None)
        }
        Err(e) => {
            writeln!(err, "ERROR: {e}")?;
            Ok(None)
        }
    }
}

/// Explain how to provide the token.
pub fn write_token_guidance(out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    writeln!(err, "ERROR: The {TOKEN_VAR} environment variable is not set.")?;
    writeln!(out, "Please set your Hugging Face API token as {TOKEN_VAR}.")?;
    writeln!(out, "Example (Linux/macOS): export {TOKEN_VAR}='your_token_here'")?;
    writeln!(out, "Example (Windows PowerShell): $env:{TOKEN_VAR}='your_token_here'")?;
    Ok(())
}

/// Map the outcome of [`Cli::run`] to the process exit status.
pub fn exit_code(result: Result<ExitCode>, err: &mut impl Write) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(e) => {
            let _ = writeln!(err, "Unhandled error in main: {e:#}");
            ExitCode::FAILURE
        }
    }
}
