use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::server::ToolServer;

/// Configuration for an agent session.
///
/// Options are built once per run with [`AgentOptionsBuilder`], are
/// immutable afterwards, and are passed by value into
/// [`crate::AgentClient::connect`].
#[derive(Clone, Debug)]
pub struct AgentOptions {
    /// The system instructions for the session.
    pub system_prompt: String,
    /// Tool servers available to the runtime, keyed by alias.
    pub mcp_servers: BTreeMap<String, Arc<ToolServer>>,
    /// Fully-qualified names of the tools the runtime may invoke.
    pub allowed_tools: BTreeSet<String>,
    /// Maximum number of assistant turns, `None` for no cap.
    pub max_turns: Option<u32>,
}

/// Builder for [`AgentOptions`].
#[derive(Clone, Debug)]
pub struct AgentOptionsBuilder {
    system_prompt: String,
    mcp_servers: BTreeMap<String, Arc<ToolServer>>,
    allowed_tools: BTreeSet<String>,
    max_turns: Option<u32>,
}

impl AgentOptionsBuilder {
    /// Creates a builder with the given system prompt.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(system_prompt: S) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            mcp_servers: BTreeMap::new(),
            allowed_tools: BTreeSet::new(),
            max_turns: None,
        }
    }

    /// Registers a tool server under an alias.
    #[inline]
    pub fn with_tool_server<S: Into<String>>(
        mut self,
        alias: S,
        server: ToolServer,
    ) -> Self {
        self.mcp_servers.insert(alias.into(), Arc::new(server));
        self
    }

    /// Allows the runtime to invoke the tool with the given
    /// fully-qualified name.
    #[inline]
    pub fn allow_tool<S: Into<String>>(mut self, name: S) -> Self {
        self.allowed_tools.insert(name.into());
        self
    }

    /// Caps the number of assistant turns.
    #[inline]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    /// Builds the options.
    #[inline]
    pub fn build(self) -> AgentOptions {
        AgentOptions {
            system_prompt: self.system_prompt,
            mcp_servers: self.mcp_servers,
            allowed_tools: self.allowed_tools,
            max_turns: self.max_turns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::qualified_name;

    #[test]
    fn test_builder() {
        let options = AgentOptionsBuilder::with_system_prompt("Be helpful.")
            .with_tool_server("weather", ToolServer::new("weather", "1.0.0"))
            .allow_tool(qualified_name("weather", "get_weather"))
            .with_max_turns(5)
            .build();

        assert_eq!(options.system_prompt, "Be helpful.");
        assert!(options.mcp_servers.contains_key("weather"));
        assert_eq!(options.allowed_tools.len(), 1);
        assert_eq!(options.max_turns, Some(5));
    }
}
