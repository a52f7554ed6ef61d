use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message event streamed from an agent session.
///
/// Events are polymorphic over role; consumers match the variants they
/// care about and ignore the rest. The shell in this repository only
/// inspects [`MessageEvent::Assistant`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageEvent {
    /// A complete assistant message.
    Assistant(AssistantMessage),
    /// The result of a tool invocation requested by the assistant.
    ToolResult(ToolCallResult),
    /// A runtime notification, such as a turn-limit stop.
    System(String),
}

/// An assistant message, a sequence of content blocks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssistantMessage {
    /// The content blocks of this message.
    pub content: Vec<ContentBlock>,
}

/// A single block of message content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A plain text block.
    Text {
        /// The text of this block.
        text: String,
    },
    /// A request to invoke a tool.
    ToolUse(ToolCallRequest),
}

impl ContentBlock {
    /// Creates a text block.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentBlock::Text { text: text.into() }
    }
}

/// Describes a tool invocation requested by the assistant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The fully-qualified name of the tool to call.
    pub name: String,
    /// The arguments to pass to the tool.
    pub arguments: Value,
}

/// The result of a tool invocation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// The identifier of the originating [`ToolCallRequest`].
    pub id: String,
    /// The content blocks produced by the tool.
    pub content: Vec<ContentBlock>,
    /// Whether the invocation failed. A failed invocation carries its
    /// reason as a text block.
    pub is_error: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_content_block_wire_format() {
        let block = ContentBlock::text("The weather is fine.");
        let serialized = serde_json::to_value(&block).unwrap();
        assert_eq!(
            serialized,
            json!({ "type": "text", "text": "The weather is fine." })
        );

        let block = ContentBlock::ToolUse(ToolCallRequest {
            id: "call:1".to_owned(),
            name: "mcp__weather__get_weather".to_owned(),
            arguments: json!({ "location": "Tokyo" }),
        });
        let serialized = serde_json::to_value(&block).unwrap();
        assert_eq!(serialized["type"], "tool_use");
        assert_eq!(serialized["name"], "mcp__weather__get_weather");
    }
}
