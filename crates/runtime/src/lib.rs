//! tinyagent runtime.
//!
//! [`Agent`] is the capability the REPL drives: load tools, attach a server,
//! run a turn as a stream of [`Fragment`]s. [`TinyAgent`] implements it by
//! alternating chat completions with MCP tool calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use runtime::{Agent, TinyAgent};
//! use llm::{Client, General, HttpProvider};
//! use mcp::ServerDescriptor;
//!
//! let provider = HttpProvider::router(Client::new(), &token)?;
//! let servers = vec![ServerDescriptor::stdio("npx", ["@playwright/mcp@latest"])];
//! let mut agent = TinyAgent::new(provider, General::new("Qwen/Qwen2.5-72B-Instruct"), servers);
//! agent.load_tools().await?;
//! let turn = agent.run("open example.com");
//! ```

pub use agent::Agent;
pub use fragment::{Fragment, FragmentKind, Payload};
pub use tiny::{ASK_QUESTION, DEFAULT_SYSTEM_PROMPT, MAX_TURNS, TASK_COMPLETE, TinyAgent};

mod agent;
mod fragment;
mod tiny;
