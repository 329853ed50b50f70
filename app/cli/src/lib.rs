//! tinyagent CLI: environment configuration, agent bootstrap and the
//! interactive REPL.

pub use cmd::Cli;
pub use config::{Config, ConfigError, FailurePolicy};

pub mod bootstrap;
pub mod cmd;
pub mod config;
pub mod repl;
pub mod terminal;
