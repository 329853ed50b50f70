//! Per-request model settings.

use crate::{Tool, ToolChoice};

/// Model and tool settings applied to every request.
#[derive(Debug, Clone)]
pub struct General {
    pub model: String,

    /// Tools offered to the model; `None` sends no tool fields
    pub tools: Option<Vec<Tool>>,

    /// Defaults to `auto` whenever tools are offered
    pub tool_choice: Option<ToolChoice>,

    /// Provider default when unset
    pub max_tokens: Option<u32>,
}

impl General {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Offer `tools`; an empty list offers none.
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = (!tools.is_empty()).then_some(tools);
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }
}

impl Default for General {
    fn default() -> Self {
        Self {
            model: "Qwen/Qwen2.5-72B-Instruct".into(),
            tools: None,
            tool_choice: None,
            max_tokens: None,
        }
    }
}
