use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The events in a scripted assistant turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ScriptEvent {
    /// A text block in the assistant message.
    #[serde(rename = "text")]
    Text(String),
    /// A tool invocation, addressed by fully-qualified name.
    #[serde(rename = "tool_call")]
    ToolCall {
        /// The fully-qualified tool name, e.g.
        /// `mcp__weather__get_weather`.
        name: String,
        /// The arguments to pass to the tool.
        arguments: Value,
    },
}

/// One scripted assistant turn.
///
/// A turn that contains no tool calls completes the response; a turn
/// with tool calls expects a follow-up turn in the script.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssistantTurn {
    /// Events in this turn.
    pub events: Vec<ScriptEvent>,
}

impl AssistantTurn {
    /// Creates an `AssistantTurn` with the specified events.
    #[inline]
    pub fn with_events(events: impl Into<Vec<ScriptEvent>>) -> Self {
        Self {
            events: events.into(),
        }
    }

    /// Creates a turn that contains a single text block.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            events: vec![ScriptEvent::Text(text.into())],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let turn = AssistantTurn::with_events([
            ScriptEvent::Text("Let me check.".to_string()),
            ScriptEvent::ToolCall {
                name: "mcp__weather__get_weather".to_string(),
                arguments: json!({ "location": "Tokyo" }),
            },
        ]);

        let serialized = serde_json::to_string(&turn).unwrap();
        let deserialized: AssistantTurn =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(turn, deserialized);
    }
}
