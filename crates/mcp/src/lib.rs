//! MCP client bridge: connects to tool servers and dispatches tool calls.
//!
//! Servers are declared with a [`ServerDescriptor`] and connected through
//! the [`McpBridge`], which speaks MCP via the rmcp SDK. Nothing in this
//! crate frames protocol messages itself.

pub use bridge::{McpBridge, call_params, convert_tool};
pub use server::ServerDescriptor;

mod bridge;
mod server;
