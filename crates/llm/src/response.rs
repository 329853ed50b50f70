//! Non-streaming chat completion responses.
//!
//! Routed providers differ in which optional fields they send, so
//! everything except `choices` is lenient.

use crate::{Message, ToolCall};
use serde::{Deserialize, Deserializer};

/// A chat completion returned by the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: String,

    /// Model that actually served the request
    #[serde(default)]
    pub model: String,

    pub choices: Vec<Choice>,

    #[serde(default)]
    pub usage: Option<Usage>,
}

impl Response {
    /// The first choice as a history entry.
    pub fn message(&self) -> Option<Message> {
        self.choices.first().map(Choice::to_message)
    }

    /// Text of the first choice, if the model produced any.
    pub fn text(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }

    /// Tool calls requested by the first choice.
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.choices
            .first()
            .map(|choice| choice.message.tool_calls.as_slice())
            .unwrap_or_default()
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.choices.first()?.finish_reason
    }
}

/// One candidate completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,

    pub message: Reply,

    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

impl Choice {
    /// Convert into an assistant message for the history.
    pub fn to_message(&self) -> Message {
        Message::assistant(
            self.message.content.clone().unwrap_or_default(),
            self.message.tool_calls.iter().cloned(),
        )
    }
}

/// Assistant output inside a choice.
///
/// `content` is null when the model only calls tools; some providers also
/// send `"tool_calls": null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tool_calls: Vec<ToolCall>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ToolCall>, D::Error> {
    Ok(Option::<Vec<ToolCall>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    /// Provider-specific values such as `eos_token`
    #[serde(other)]
    Other,
}

/// Token accounting for one request.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
