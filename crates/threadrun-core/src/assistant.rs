//! Assistant creation payload.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Tool tag enabled on an assistant.
///
/// Known tags get their own variant; anything else is forwarded as-is so new
/// remote tool types work without a release.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolType {
    /// Sandboxed code execution.
    CodeInterpreter,
    /// Retrieval over attached files.
    FileSearch,
    /// Caller-defined function.
    Function,
    /// Any other tag, verbatim.
    Custom(String),
}

impl ToolType {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::CodeInterpreter => "code_interpreter",
            Self::FileSearch => "file_search",
            Self::Function => "function",
            Self::Custom(tag) => tag,
        }
    }
}

impl From<String> for ToolType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "code_interpreter" => Self::CodeInterpreter,
            "file_search" => Self::FileSearch,
            "function" => Self::Function,
            _ => Self::Custom(value),
        }
    }
}

impl From<ToolType> for String {
    fn from(value: ToolType) -> Self {
        value.as_str().to_owned()
    }
}

/// Request to create an assistant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssistant {
    /// System instructions for the persona.
    #[serde(default)]
    pub instructions: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Enabled tool tags.
    #[serde(default)]
    pub tools: Vec<ToolType>,
    /// Model ID.
    pub model: String,
}

impl NewAssistant {
    /// Remote request body: tools expand to `[{"type": tag}]`, duplicates dropped.
    pub fn to_request_body(&self) -> Value {
        let mut seen = Vec::with_capacity(self.tools.len());
        for tool in &self.tools {
            if !seen.contains(&tool) {
                seen.push(tool);
            }
        }
        let tools: Vec<Value> = seen
            .into_iter()
            .map(|tool| json!({ "type": tool.as_str() }))
            .collect();
        json!({
            "instructions": self.instructions,
            "name": self.name,
            "tools": tools,
            "model": self.model,
        })
    }
}
