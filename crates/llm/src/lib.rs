//! Chat completion types and the `LLM` trait shared by the agent runtime.
//!
//! Types follow the OpenAI chat-completions wire format, which is what the
//! Hugging Face inference router speaks. `HttpProvider` (feature `http`)
//! sends non-streaming requests to any compatible endpoint.

pub use config::General;
#[cfg(feature = "http")]
pub use http::{DEFAULT_PROVIDER, HttpProvider, ROUTER_ENDPOINT, model_id};
pub use message::{Message, Role};
pub use provider::LLM;
pub use request::Request;
#[cfg(feature = "http")]
pub use reqwest::{self, Client};
pub use response::{Choice, FinishReason, Reply, Response, Usage};
pub use tool::{FunctionCall, Tool, ToolCall, ToolChoice};

mod config;
#[cfg(feature = "http")]
mod http;
mod message;
mod provider;
mod request;
mod response;
mod tool;
