//! The [`McpBridge`] holds connected MCP server peers and provides
//! tool listing and call dispatch through the MCP protocol.

use crate::ServerDescriptor;
use anyhow::{Context, Result};
use compact_str::CompactString;
use llm::Tool;
use rmcp::{
    ServiceExt,
    model::{CallToolRequestParams, RawContent},
    service::{RoleClient, RunningService},
    transport::{StreamableHttpClientTransport, TokioChildProcess},
};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// A connected MCP server peer with its tool names.
struct ConnectedPeer {
    server: ServerDescriptor,
    peer: RunningService<RoleClient, ()>,
    tools: Vec<CompactString>,
}

/// Bridge to one or more MCP servers via the rmcp SDK.
///
/// Converts MCP tool definitions to chat-completion [`Tool`] schemas and
/// dispatches tool calls through the protocol.
pub struct McpBridge {
    peers: Mutex<Vec<ConnectedPeer>>,
    /// Cache of converted tools keyed by name.
    tool_cache: Mutex<BTreeMap<CompactString, Tool>>,
}

impl Default for McpBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl McpBridge {
    /// Create a new empty bridge with no connected peers.
    pub fn new() -> Self {
        Self {
            peers: Mutex::new(Vec::new()),
            tool_cache: Mutex::new(BTreeMap::new()),
        }
    }

    /// Connect to a server and register its tools.
    ///
    /// Returns the number of tools the server contributed. A tool whose
    /// name is already registered by an earlier server is skipped.
    pub async fn connect(&self, server: &ServerDescriptor) -> Result<usize> {
        let peer: RunningService<RoleClient, ()> = match server {
            ServerDescriptor::Stdio { .. } => {
                let command = server.command().context("stdio server without command")?;
                let transport = TokioChildProcess::new(command)
                    .with_context(|| format!("failed to spawn `{server}`"))?;
                ().serve(transport)
                    .await
                    .with_context(|| format!("MCP handshake with `{server}` failed"))?
            }
            ServerDescriptor::Http { url } => {
                let transport = StreamableHttpClientTransport::from_uri(url.as_str());
                ().serve(transport)
                    .await
                    .with_context(|| format!("MCP handshake with {url} failed"))?
            }
        };

        let mcp_tools = peer
            .list_all_tools()
            .await
            .with_context(|| format!("failed to list tools of `{server}`"))?;
        let mut tool_names = Vec::with_capacity(mcp_tools.len());

        {
            let mut cache = self.tool_cache.lock().await;
            for mcp_tool in &mcp_tools {
                let tool = convert_tool(mcp_tool);
                let name = CompactString::from(tool.name.as_str());
                if cache.contains_key(&name) {
                    tracing::warn!("tool '{name}' from `{server}` shadows an existing tool, skipped");
                    continue;
                }
                tool_names.push(name.clone());
                cache.insert(name, tool);
            }
        }

        tracing::info!("connected `{server}` with {} tools", tool_names.len());
        let count = tool_names.len();
        self.peers.lock().await.push(ConnectedPeer {
            server: server.clone(),
            peer,
            tools: tool_names,
        });

        Ok(count)
    }

    /// List all tools available across all connected peers.
    pub async fn tools(&self) -> Vec<Tool> {
        self.tool_cache.lock().await.values().cloned().collect()
    }

    /// Descriptors of the servers connected so far.
    pub async fn servers(&self) -> Vec<ServerDescriptor> {
        self.peers
            .lock()
            .await
            .iter()
            .map(|p| p.server.clone())
            .collect()
    }

    /// Call a tool by name, routing to the correct peer.
    ///
    /// Returns the tool output as a String. If the tool is not found
    /// or the call fails, returns an error description.
    pub async fn call(&self, name: &str, arguments: &str) -> String {
        let peers = self.peers.lock().await;
        let connected = peers
            .iter()
            .find(|p| p.tools.iter().any(|t| t.as_str() == name));

        let Some(connected) = connected else {
            return format!("mcp tool '{name}' not available");
        };

        let params = match call_params(name, arguments) {
            Ok(params) => params,
            Err(e) => return format!("invalid tool arguments: {e}"),
        };

        tracing::debug!("calling '{name}' on `{}`", connected.server);
        match connected.peer.call_tool(params).await {
            Ok(result) => {
                if result.is_error == Some(true) {
                    format!("mcp tool error: {}", extract_text(&result.content))
                } else {
                    extract_text(&result.content)
                }
            }
            Err(e) => format!("mcp call failed: {e}"),
        }
    }

    /// Cancel every peer, terminating spawned server processes.
    pub async fn shutdown(&self) {
        let peers = std::mem::take(&mut *self.peers.lock().await);
        self.tool_cache.lock().await.clear();
        for connected in peers {
            if let Err(e) = connected.peer.cancel().await {
                tracing::warn!("failed to stop `{}`: {e}", connected.server);
            }
        }
    }
}

/// Build call parameters from the model's raw JSON arguments.
///
/// Blank arguments send none; anything else must be a JSON object.
pub fn call_params(name: &str, arguments: &str) -> serde_json::Result<CallToolRequestParams> {
    let params = CallToolRequestParams::new(name.to_owned());
    if arguments.trim().is_empty() {
        return Ok(params);
    }
    let args: serde_json::Map<String, serde_json::Value> = serde_json::from_str(arguments)?;
    Ok(params.with_arguments(args))
}

/// Convert an rmcp Tool to a chat-completion Tool.
pub fn convert_tool(mcp_tool: &rmcp::model::Tool) -> Tool {
    let schema_value =
        serde_json::to_value(mcp_tool.input_schema.as_ref()).unwrap_or(serde_json::json!({}));
    let parameters: schemars::Schema =
        serde_json::from_value(schema_value).unwrap_or_else(|_| schemars::schema_for!(String));

    Tool {
        name: mcp_tool.name.to_string(),
        description: mcp_tool
            .description
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default(),
        parameters,
    }
}

/// Extract text content from MCP Content items.
fn extract_text(content: &[rmcp::model::Content]) -> String {
    content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
