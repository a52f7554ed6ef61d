//! The weather agent demo binary.
//!
//! Runs two example queries against a scripted in-process runtime. The
//! scripted sessions really invoke the registered weather tool, so the
//! full registration/dispatch path is exercised; point the runner at
//! another [`weather_agent_client::AgentClient`] implementation to talk
//! to a live runtime instead.

use std::process;

use owo_colors::OwoColorize;
use serde_json::json;
use weather_agent::config::BackendConfig;
use weather_agent::{LineKind, run_weather_agent};
use weather_agent_client::tool::qualified_name;
use weather_agent_scripted_client::{
    AssistantTurn, ScriptEvent, ScriptedClient,
};

const EXAMPLE_QUERIES: [&str; 2] = [
    "What's the weather like in San Francisco?",
    "How's the weather in Tokyo?",
];

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("{}", BackendConfig::from_env());

    let client = demo_client();
    for query in EXAMPLE_QUERIES {
        if let Err(err) = run_weather_agent(&client, query, print_line).await
        {
            eprintln!("weather agent failed: {err}");
            process::exit(1);
        }
    }
}

/// Scripts one session per example query: a turn that calls the
/// weather tool, then a closing turn that reads out the report.
fn demo_client() -> ScriptedClient {
    let mut client = ScriptedClient::default();
    for location in ["San Francisco", "Tokyo"] {
        client.add_session([
            AssistantTurn::with_events([
                ScriptEvent::Text(format!(
                    "Let me check the weather in {location}."
                )),
                ScriptEvent::ToolCall {
                    name: qualified_name("weather", "get_weather"),
                    arguments: json!({ "location": location }),
                },
            ]),
            AssistantTurn::text(format!(
                "The weather in {location} is 69F (nice and comfortable!)"
            )),
        ]);
    }
    client
}

fn print_line(line: &str, kind: LineKind) {
    match kind {
        LineKind::Banner => println!("{line}"),
        LineKind::Assistant => println!("{}", line.bright_white()),
    }
}
