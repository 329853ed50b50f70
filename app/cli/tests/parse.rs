//! Tests for CLI argument parsing.

use clap::{CommandFactory, Parser};
use tinyagent_cli::Cli;

#[test]
fn cli_parse_no_arguments() {
    assert!(Cli::try_parse_from(["tinyagent"]).is_ok());
}

#[test]
fn cli_rejects_unknown_flags() {
    assert!(Cli::try_parse_from(["tinyagent", "--model", "gpt-4"]).is_err());
}

#[test]
fn cli_rejects_positional_prompt() {
    assert!(Cli::try_parse_from(["tinyagent", "hello"]).is_err());
}

#[test]
fn cli_has_version() {
    let err = Cli::try_parse_from(["tinyagent", "--version"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
}

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}
