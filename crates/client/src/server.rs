use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::pin::Pin;

use serde_json::Value;

use crate::tool::{
    AnyTool, Error, Tool, ToolDescriptor, ToolObject, ToolResult,
};

/// A named, versioned bundle of tools exposed to the agent runtime.
///
/// A server is registered in [`crate::AgentOptions`] under an alias, and
/// its tools are addressed by the runtime through their fully-qualified
/// names (see [`crate::tool::qualified_name`]). The tool set is fixed
/// once the server is built.
pub struct ToolServer {
    name: String,
    version: String,
    tools: HashMap<String, Box<dyn ToolObject>>,
}

impl ToolServer {
    /// Creates an empty tool server.
    #[inline]
    pub fn new<S1: Into<String>, S2: Into<String>>(
        name: S1,
        version: S2,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            tools: HashMap::new(),
        }
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        let tool = Box::new(AnyTool(tool));
        self.tools.insert(tool.name().to_owned(), tool);
        self
    }

    /// Returns the name of this server.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the version of this server.
    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the descriptors of all registered tools.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: tool.parameter_schema().clone(),
            })
            .collect()
    }

    /// Dispatches an invocation to the tool registered under `name`.
    ///
    /// Unknown names resolve to an `UnknownTool` error, malformed
    /// arguments to an `InvalidInput` error; neither panics.
    pub fn dispatch(
        &self,
        name: &str,
        arguments: Value,
    ) -> Pin<Box<dyn Future<Output = ToolResult> + Send>> {
        let Some(tool) = self.tools.get(name) else {
            warn!("tool not found: {name}");
            let err = Error::unknown_tool()
                .with_reason(format!("no tool named `{name}`"));
            return Box::pin(std::future::ready(Err(err)));
        };
        trace!("dispatching tool `{name}` with args: {arguments:?}");
        tool.execute(arguments)
    }
}

impl Debug for ToolServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolServer")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use serde_json::json;

    use super::*;
    use crate::tool::{ErrorKind, ToolOutput};

    static EMPTY_SCHEMA: &Value = &Value::Null;

    struct TestTool;

    impl Tool for TestTool {
        type Input = serde_json::Value;

        fn name(&self) -> &str {
            "test_tool"
        }

        fn description(&self) -> &str {
            "A test tool"
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            _input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok(ToolOutput::text("success")))
        }
    }

    #[tokio::test]
    async fn test_dispatch() {
        let server =
            ToolServer::new("test-tools", "1.0.0").with_tool(TestTool);

        let output = server.dispatch("test_tool", json!({})).await.unwrap();
        assert_eq!(output.content.len(), 1);

        let err = server
            .dispatch("missing_tool", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownTool);
    }

    #[test]
    fn test_descriptors() {
        let server =
            ToolServer::new("test-tools", "1.0.0").with_tool(TestTool);
        let descriptors = server.descriptors();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "test_tool");
        assert_eq!(descriptors[0].description, "A test tool");
    }
}
