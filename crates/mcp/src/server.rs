//! Tool server descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::process::Command;

/// How to reach one MCP tool server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerDescriptor {
    /// A child process speaking MCP over its stdin/stdout.
    Stdio {
        /// Program to launch.
        command: String,
        /// Arguments passed to the program.
        #[serde(default)]
        args: Vec<String>,
    },
    /// A remote server reached over streamable HTTP.
    Http {
        /// Endpoint URL.
        url: String,
    },
}

impl ServerDescriptor {
    /// Describe a process-spawned server.
    pub fn stdio<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Stdio {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Describe a URL-based server.
    pub fn http(url: impl Into<String>) -> Self {
        Self::Http { url: url.into() }
    }

    /// Build the launch command for a stdio server.
    pub fn command(&self) -> Option<Command> {
        match self {
            Self::Stdio { command, args } => {
                let mut cmd = Command::new(command);
                cmd.args(args);
                Some(cmd)
            }
            Self::Http { .. } => None,
        }
    }
}

impl fmt::Display for ServerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio { command, args } if args.is_empty() => write!(f, "{command}"),
            Self::Stdio { command, args } => write!(f, "{command} {}", args.join(" ")),
            Self::Http { url } => write!(f, "{url}"),
        }
    }
}
