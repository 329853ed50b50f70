//! Response fragments yielded by an agent turn.

use llm::ToolCall;
use serde::Serialize;
use serde_json::Value;

/// What produced a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    /// Text written by the model for the user.
    Agent,
    /// A tool invocation requested by the model.
    ToolCall,
    /// The result of a tool invocation.
    Tool,
}

/// Fragment payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Plain text.
    Text(String),
    /// Structured data, rendered pretty-printed.
    Json(Value),
}

/// One unit of a streamed response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    /// Kind marker.
    pub kind: FragmentKind,
    /// Content, absent for fragments that only mark progress.
    pub payload: Option<Payload>,
}

impl Fragment {
    /// Create a fragment from its parts.
    pub fn new(kind: FragmentKind, payload: Option<Payload>) -> Self {
        Self { kind, payload }
    }

    /// Model text.
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(FragmentKind::Agent, Some(Payload::Text(text.into())))
    }

    /// A tool call, as `{ "name": .., "arguments": .. }`.
    ///
    /// Arguments that parse as JSON are embedded structurally; anything
    /// else is kept as the raw string.
    pub fn tool_call(call: &ToolCall) -> Self {
        let raw = call.function.arguments.trim();
        let arguments = if raw.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
        };
        Self::new(
            FragmentKind::ToolCall,
            Some(Payload::Json(serde_json::json!({
                "name": call.function.name,
                "arguments": arguments,
            }))),
        )
    }

    /// A tool result.
    pub fn tool(output: impl Into<String>) -> Self {
        Self::new(FragmentKind::Tool, Some(Payload::Text(output.into())))
    }

    /// Whether this fragment is model output addressed to the user.
    pub fn is_agent(&self) -> bool {
        self.kind == FragmentKind::Agent
    }
}
