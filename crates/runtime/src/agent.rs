//! Agent capability consumed by the REPL.
//!
//! Uses RPITIT, no dyn dispatch. The binary drives a concrete
//! [`crate::TinyAgent`]; tests substitute scripted implementations.

use crate::Fragment;
use anyhow::Result;
use futures_core::Stream;
use mcp::ServerDescriptor;
use std::future::Future;

/// A conversational agent backed by tool servers.
pub trait Agent {
    /// Connect the servers declared at construction and register their tools.
    fn load_tools(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Connect one more server after construction.
    fn add_server(&mut self, server: ServerDescriptor) -> impl Future<Output = Result<()>> + Send;

    /// Process one user turn.
    ///
    /// The stream is finite and one-shot. Dropping it early abandons the
    /// turn.
    fn run<'a>(&'a mut self, input: &'a str) -> impl Stream<Item = Result<Fragment>> + Send + 'a;
}
