//! Agent construction and startup tool loading.

use crate::config::{Config, FailurePolicy};
use anyhow::{Context, Result};
use llm::{Client, General, HttpProvider};
use runtime::{Agent, TinyAgent};
use std::io::Write;

/// Build the agent described by `config`.
///
/// No servers are contacted yet; see [`start`].
pub fn build(config: &Config) -> Result<TinyAgent<HttpProvider>> {
    let client = Client::new();
    let provider = match &config.endpoint_url {
        Some(endpoint) => HttpProvider::bearer(client, &config.token, endpoint.as_str())?,
        None => HttpProvider::router(client, &config.token)?,
    };
    let general = General::new(config.model_id());
    tracing::info!(
        "using model {} via {}",
        general.model,
        provider.endpoint()
    );
    Ok(TinyAgent::new(provider, general, config.servers.clone()).max_turns(config.max_turns))
}

/// Load tools from the declared servers, then attach the URL server if one
/// is configured. Failures on either path follow the configured policy.
pub async fn start<A: Agent>(
    agent: &mut A,
    config: &Config,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Loading tools from stdio servers...")?;
    if let Err(e) = agent.load_tools().await {
        match config.load_policy {
            FailurePolicy::Fatal => return Err(e.context("failed to load tools")),
            FailurePolicy::Warn => {
                tracing::warn!("continuing without some tools: {e:#}");
                writeln!(err, "Failed to load tools: {e:#}")?;
            }
        }
    }

    if let Some(server) = &config.url_server {
        writeln!(out, "Adding URL server: {server}")?;
        match agent.add_server(server.clone()).await {
            Ok(()) => writeln!(out, "URL server added.")?,
            Err(e) => match config.attach_policy {
                FailurePolicy::Fatal => {
                    return Err(e).with_context(|| format!("failed to add URL server {server}"));
                }
                FailurePolicy::Warn => writeln!(err, "Failed to add URL server: {e:#}")?,
            },
        }
    }

    writeln!(out, "All tools attempted to load.")?;
    writeln!(
        out,
        "Type your prompts to interact with the agent. Type 'exit' or 'quit' to stop."
    )?;
    writeln!(out, "---")?;
    Ok(())
}
