//! The OpenAI-compatible request body

use crate::{General, Message, Tool, ToolChoice};
use serde::Serialize;
use serde_json::{Value, json};

/// The request body for a chat completion
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The model we are using
    pub model: String,

    /// The messages to send to the API
    pub messages: Vec<Message>,

    /// Whether to stream the response
    pub stream: bool,

    /// The maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Controls which (if any) tool is called by the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,

    /// A list of tools the model may call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
}

impl Request {
    /// Attach the conversation to the request
    pub fn messages(self, messages: &[Message]) -> Self {
        Self {
            messages: messages.to_vec(),
            ..self
        }
    }

    /// Override the tool choice
    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = serde_json::to_value(tool_choice).ok();
        self
    }
}

impl From<General> for Request {
    fn from(config: General) -> Self {
        let tools = config.tools.as_deref().and_then(serialize_tools);
        let tool_choice = match (&tools, config.tool_choice) {
            (None, _) => None,
            (Some(_), choice) => serde_json::to_value(choice.unwrap_or_default()).ok(),
        };
        Self {
            model: config.model,
            messages: Vec::new(),
            stream: false,
            max_tokens: config.max_tokens,
            tool_choice,
            tools,
        }
    }
}

/// Wrap tools in the `{ "type": "function", "function": .. }` envelope
fn serialize_tools(tools: &[Tool]) -> Option<Vec<Value>> {
    if tools.is_empty() {
        return None;
    }

    Some(
        tools
            .iter()
            .map(|tool| json!({ "type": "function", "function": tool }))
            .collect(),
    )
}
