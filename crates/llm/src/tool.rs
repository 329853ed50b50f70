//! Tool definitions offered to the model and the calls it makes.

use schemars::Schema;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::json;

/// A function the model may call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object
    pub parameters: Schema,
}

/// One invocation requested by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Always `function` in practice
    #[serde(rename = "type", default = "ToolCall::function_kind")]
    pub call_type: String,

    pub function: FunctionCall,
}

impl ToolCall {
    fn function_kind() -> String {
        "function".into()
    }
}

/// Target and raw arguments of a call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default)]
    pub name: String,

    /// JSON-encoded arguments, exactly as the model produced them
    #[serde(default)]
    pub arguments: String,
}

/// Constraint on whether, and which, tool the model calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolChoice {
    None,
    #[default]
    Auto,
    Required,
    /// Force a call to the named function
    Function(String),
}

impl Serialize for ToolChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_str("none"),
            Self::Auto => serializer.serialize_str("auto"),
            Self::Required => serializer.serialize_str("required"),
            Self::Function(name) => {
                json!({ "type": "function", "function": { "name": name } }).serialize(serializer)
            }
        }
    }
}

impl From<&str> for ToolChoice {
    fn from(name: &str) -> Self {
        Self::Function(name.into())
    }
}
