//! Provider abstraction for chat completions

use crate::{General, Message, Response};
use anyhow::Result;

/// A trait for LLM providers
pub trait LLM: Clone + Send + Sync {
    /// Send the conversation and return one completion
    fn send(
        &self,
        config: &General,
        messages: &[Message],
    ) -> impl Future<Output = Result<Response>> + Send;
}
