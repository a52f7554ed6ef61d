//! Tool call supports.

mod error;

use std::pin::Pin;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::message::ContentBlock;

pub use error::{Error, ErrorKind};

/// The result of a tool call.
pub type ToolResult = Result<ToolOutput, Error>;

/// The output of a successful tool call.
///
/// An output carries at least one content block; tools that produce a
/// single piece of text should use [`ToolOutput::text`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolOutput {
    /// The content blocks of this output.
    pub content: Vec<ContentBlock>,
}

impl ToolOutput {
    /// Creates an output with a single text block.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
        }
    }
}

/// Describes a tool to the agent runtime.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolDescriptor {
    /// Name of the tool, unique within its server.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool, as a
    /// [JSON schema](https://json-schema.org/).
    pub parameters: Value,
}

/// A tool that can be called by the agent runtime.
///
/// Implementations of this trait should be stateless, and may not
/// maintain any internal state.
pub trait Tool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    type Input: DeserializeOwned;

    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Returns the parameter schema of the tool.
    fn parameter_schema(&self) -> &Value;

    /// Executes the tool with the given input.
    ///
    /// This method must return a future that is fully independent of
    /// `self`, and the future should be cancellation safe.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static;
}

/// Produces the fully-qualified identifier of a tool hosted by the
/// server registered under `server`.
#[inline]
pub fn qualified_name(server: &str, tool: &str) -> String {
    format!("mcp__{server}__{tool}")
}

/// Splits a fully-qualified tool identifier back into its server alias
/// and tool name. Returns `None` if the identifier is not qualified.
pub fn split_qualified_name(qualified: &str) -> Option<(&str, &str)> {
    qualified.strip_prefix("mcp__")?.split_once("__")
}

pub(crate) trait ToolObject: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameter_schema(&self) -> &Value;

    fn execute(
        &self,
        arguments: Value,
    ) -> Pin<Box<dyn Future<Output = ToolResult> + Send>>;
}

pub(crate) struct AnyTool<T: Tool>(pub T);

impl<T: Tool> ToolObject for AnyTool<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    #[inline]
    fn description(&self) -> &str {
        self.0.description()
    }

    #[inline]
    fn parameter_schema(&self) -> &Value {
        self.0.parameter_schema()
    }

    #[inline]
    fn execute(
        &self,
        arguments: Value,
    ) -> Pin<Box<dyn Future<Output = ToolResult> + Send>> {
        let input: T::Input = match serde_json::from_value(arguments) {
            Ok(input) => input,
            Err(err) => {
                let reason = format!("{err}");
                return Box::pin(std::future::ready(ToolResult::Err(
                    Error::invalid_input().with_reason(reason),
                )));
            }
        };
        Box::pin(self.0.execute(input))
    }
}
