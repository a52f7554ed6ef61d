use std::future::poll_fn;
use std::pin::pin;

use weather_agent_client::tool::qualified_name;
use weather_agent_client::{
    AgentClient, AgentOptions, AgentOptionsBuilder, AgentSession,
    ContentBlock, MessageEvent, ToolServer,
};

use crate::tools::WeatherTool;

const SYSTEM_PROMPT: &str = "You are a helpful weather assistant. Use the \
get_weather tool to check weather for any location the user asks about.";

/// The server alias the weather tools are registered under.
const SERVER_ALIAS: &str = "weather";

/// The width of the banner rule printed before each query.
const RULE_WIDTH: usize = 50;

/// The kind of a console line reported by [`run_weather_agent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Part of the per-query banner.
    Banner,
    /// An assistant response line.
    Assistant,
}

/// Builds the tool server bundling the weather tools.
pub fn weather_tool_server() -> ToolServer {
    ToolServer::new("weather-tools", "1.0.0").with_tool(WeatherTool::new())
}

/// Builds the session options of the weather agent.
///
/// The options are the same for every query: the weather system prompt,
/// the weather tool server under the `weather` alias, exactly one
/// allowed tool, and a five-turn cap.
pub fn agent_options() -> AgentOptions {
    AgentOptionsBuilder::with_system_prompt(SYSTEM_PROMPT)
        .with_tool_server(SERVER_ALIAS, weather_tool_server())
        .allow_tool(qualified_name(SERVER_ALIAS, "get_weather"))
        .with_max_turns(5)
        .build()
}

/// Runs one query/response cycle against the given client.
///
/// Console lines are reported through `emit` in order: a banner naming
/// the query, then one `Assistant: ` line per text block of every
/// assistant message in the response. Events of any other kind are
/// ignored. Errors from the client propagate to the caller unhandled;
/// the session is dropped, closing its connection, on every exit path.
pub async fn run_weather_agent<C: AgentClient>(
    client: &C,
    query: &str,
    emit: impl Fn(&str, LineKind),
) -> Result<(), C::Error> {
    let rule = "=".repeat(RULE_WIDTH);
    emit("", LineKind::Banner);
    emit(&rule, LineKind::Banner);
    emit(&format!("Query: {query}"), LineKind::Banner);
    emit(&rule, LineKind::Banner);

    let mut session = client.connect(agent_options()).await?;
    session.submit_query(query).await?;

    let mut session = pin!(session);
    loop {
        let message =
            poll_fn(|cx| session.as_mut().poll_next_message(cx)).await?;
        let Some(message) = message else {
            break;
        };
        match message {
            MessageEvent::Assistant(msg) => {
                for block in msg.content {
                    match block {
                        ContentBlock::Text { text } => {
                            emit("", LineKind::Assistant);
                            emit(
                                &format!("Assistant: {text}"),
                                LineKind::Assistant,
                            );
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    debug!("response completed for query: {query}");
    Ok(())
}
