//! Conversation history entries in the chat-completions wire format.

use crate::ToolCall;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One entry in the conversation history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,

    #[serde(default)]
    pub content: String,

    /// Set on tool results, naming the call they answer
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub tool_call_id: CompactString,

    /// Set on assistant messages that request tools
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub tool_calls: SmallVec<[ToolCall; 4]>,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Assistant reply, optionally requesting tool calls.
    pub fn assistant(
        content: impl Into<String>,
        tool_calls: impl IntoIterator<Item = ToolCall>,
    ) -> Self {
        Self {
            tool_calls: tool_calls.into_iter().collect(),
            ..Self::with_role(Role::Assistant, content)
        }
    }

    /// Result of the tool call `call_id`.
    pub fn tool(content: impl Into<String>, call_id: impl Into<CompactString>) -> Self {
        Self {
            tool_call_id: call_id.into(),
            ..Self::with_role(Role::Tool, content)
        }
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
    Tool,
}
