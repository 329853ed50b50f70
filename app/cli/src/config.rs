//! Startup configuration, resolved once from the environment.
//!
//! Every recognised variable is listed here with its default. Nothing else
//! in the crate reads the environment.

use mcp::ServerDescriptor;
use std::{str::FromStr, time::Duration};
use thiserror::Error;

/// Hugging Face token (required).
pub const TOKEN_VAR: &str = "HF_TOKEN";
/// Inference provider.
pub const PROVIDER_VAR: &str = "PROVIDER";
/// Model identifier.
pub const MODEL_VAR: &str = "MODEL_ID";
/// Direct OpenAI-compatible endpoint, bypassing the router.
pub const ENDPOINT_VAR: &str = "ENDPOINT_URL";
/// Streamable HTTP tool server.
pub const URL_SERVER_VAR: &str = "MCP_SERVER_URL";
/// Older name for [`URL_SERVER_VAR`], still honoured.
pub const LEGACY_URL_SERVER_VAR: &str = "SENTIMENT_SERVER_URL";
/// What to do when stdio servers fail to load.
pub const LOAD_POLICY_VAR: &str = "TOOLS_FAILURE_POLICY";
/// What to do when the URL server fails to attach.
pub const ATTACH_POLICY_VAR: &str = "URL_SERVER_FAILURE_POLICY";
/// Per-turn deadline in seconds.
pub const TIMEOUT_VAR: &str = "TURN_TIMEOUT_SECS";
/// Model rounds allowed per turn.
pub const MAX_TURNS_VAR: &str = "MAX_TURNS";

/// Provider used when [`PROVIDER_VAR`] is unset.
pub const DEFAULT_PROVIDER: &str = "nous";
/// Model used when [`MODEL_VAR`] is unset.
pub const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-72B-Instruct";

/// Whether a startup failure stops the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Propagate the error; the process exits with status 1.
    Fatal,
    /// Report the error and continue without the affected tools.
    Warn,
}

impl FromStr for FailurePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fatal" => Ok(Self::Fatal),
            "warn" => Ok(Self::Warn),
            _ => Err(()),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The token variable is unset or empty.
    #[error("the {TOKEN_VAR} environment variable is not set")]
    MissingToken,
    /// A policy variable holds something other than `fatal` or `warn`.
    #[error("{var} must be `fatal` or `warn`, got `{value}`")]
    InvalidPolicy { var: &'static str, value: String },
    /// A numeric variable does not hold a positive integer.
    #[error("{var} must be a positive integer, got `{value}`")]
    InvalidNumber { var: &'static str, value: String },
}

/// Resolved startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API token sent as a bearer credential.
    pub token: String,
    /// Inference provider name.
    pub provider: String,
    /// Model identifier.
    pub model: String,
    /// Direct endpoint overriding the router.
    pub endpoint_url: Option<String>,
    /// Process-spawned tool servers loaded at startup.
    pub servers: Vec<ServerDescriptor>,
    /// Optional URL-based tool server attached after loading.
    pub url_server: Option<ServerDescriptor>,
    /// Policy for stdio tool loading failures.
    pub load_policy: FailurePolicy,
    /// Policy for URL server attach failures.
    pub attach_policy: FailurePolicy,
    /// Deadline for a single turn.
    pub turn_timeout: Option<Duration>,
    /// Model rounds allowed per turn.
    pub max_turns: usize,
}

impl Config {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup.
    ///
    /// Blank values count as unset. The token is the exception: it is
    /// taken verbatim and only an empty value counts as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let token = lookup(TOKEN_VAR)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        let url_server = var(URL_SERVER_VAR)
            .or_else(|| var(LEGACY_URL_SERVER_VAR))
            .map(ServerDescriptor::http);

        Ok(Self {
            token,
            provider: var(PROVIDER_VAR).unwrap_or_else(|| DEFAULT_PROVIDER.into()),
            model: var(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.into()),
            endpoint_url: var(ENDPOINT_VAR),
            servers: default_servers(),
            url_server,
            load_policy: policy(LOAD_POLICY_VAR, var(LOAD_POLICY_VAR), FailurePolicy::Fatal)?,
            attach_policy: policy(ATTACH_POLICY_VAR, var(ATTACH_POLICY_VAR), FailurePolicy::Warn)?,
            turn_timeout: positive(TIMEOUT_VAR, var(TIMEOUT_VAR))?.map(Duration::from_secs),
            max_turns: positive(MAX_TURNS_VAR, var(MAX_TURNS_VAR))?
                .map(|n| n as usize)
                .unwrap_or(runtime::MAX_TURNS),
        })
    }

    /// Model identifier as sent on the wire.
    ///
    /// The router takes the provider as a model suffix; a direct endpoint
    /// gets the bare model.
    pub fn model_id(&self) -> String {
        match self.endpoint_url {
            Some(_) => self.model.clone(),
            None => llm::model_id(&self.model, &self.provider),
        }
    }
}

/// The fixed set of process-spawned tool servers.
pub fn default_servers() -> Vec<ServerDescriptor> {
    vec![ServerDescriptor::stdio("npx", ["@playwright/mcp@latest"])]
}

fn policy(
    var: &'static str,
    value: Option<String>,
    default: FailurePolicy,
) -> Result<FailurePolicy, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|()| ConfigError::InvalidPolicy { var, value }),
    }
}

fn positive(var: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::InvalidNumber { var, value }),
    }
}
