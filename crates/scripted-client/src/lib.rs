//! A scripted in-process agent client for demos and tests.

#[macro_use]
extern crate tracing;

mod log;
mod script;

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{self, Poll, ready};
use std::time::Duration;

use serde_json::Value;
use tokio::time::{Sleep, sleep};
use weather_agent_client::{
    AgentClient, AgentClientError, AgentOptions, AgentSession,
    AssistantMessage, ContentBlock, ErrorKind, MessageEvent,
    ToolCallRequest, ToolCallResult, ToolServer, tool,
};

pub use log::{SessionLifecycle, SessionLog};
pub use script::{AssistantTurn, ScriptEvent};

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl AgentClientError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A scripted agent client that runs entirely in-process.
///
/// Before connecting, you need to queue one session script per expected
/// session. A script is the sequence of assistant turns the "model"
/// will produce; tool calls in a script are really dispatched through
/// the tool servers registered in the session's options, so the host's
/// tools run exactly as they would under a live runtime.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy
/// memory copies involved. You should only use it for demos and tests.
#[derive(Default)]
pub struct ScriptedClient {
    sessions: Mutex<VecDeque<Vec<AssistantTurn>>>,
    connect_failures: AtomicU64,
    delay: Option<Duration>,
    log: SessionLog,
    next_session_id: AtomicU64,
}

impl ScriptedClient {
    /// Queues the script for the next session.
    #[inline]
    pub fn add_session(&mut self, turns: impl Into<Vec<AssistantTurn>>) {
        self.sessions
            .get_mut()
            .expect("session queue lock poisoned")
            .push_back(turns.into());
    }

    /// Sets the delay between delivered events.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Makes the next `failures` connect attempts fail.
    #[inline]
    pub fn fail_connects(&mut self, failures: u64) {
        self.connect_failures.store(failures, Ordering::Relaxed);
    }

    /// Returns a handle to the session lifecycle log.
    #[inline]
    pub fn session_log(&self) -> SessionLog {
        self.log.clone()
    }
}

impl AgentClient for ScriptedClient {
    type Error = Error;
    type Session = ScriptedSession;

    fn connect(
        &self,
        options: AgentOptions,
    ) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send + 'static
    {
        let result = 'blk: {
            if self.connect_failures.load(Ordering::Relaxed) > 0 {
                self.connect_failures.fetch_sub(1, Ordering::Relaxed);
                break 'blk Err(Error {
                    message: "injected connect failure",
                    kind: ErrorKind::Connection,
                });
            }

            let script = self
                .sessions
                .lock()
                .expect("session queue lock poisoned")
                .pop_front();
            let Some(turns) = script else {
                break 'blk Err(Error {
                    message: "no scripted session to serve",
                    kind: ErrorKind::Connection,
                });
            };

            let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
            self.log.record(SessionLifecycle::Opened(id));
            debug!("opened scripted session {id}");

            Ok(ScriptedSession {
                options,
                turns: turns.into(),
                turns_taken: 0,
                needs_model_turn: false,
                finished: false,
                queued: VecDeque::new(),
                running: None,
                next_call_id: 1,
                delay: self.delay.unwrap_or(Duration::from_millis(1)),
                sleep: None,
                id,
                log: self.log.clone(),
            })
        };
        ready(result)
    }
}

/// A session served by [`ScriptedClient`].
///
/// The session closes (and records `Closed` in the lifecycle log) when
/// it is dropped.
pub struct ScriptedSession {
    options: AgentOptions,
    turns: VecDeque<AssistantTurn>,
    turns_taken: u32,
    needs_model_turn: bool,
    finished: bool,
    queued: VecDeque<MessageEvent>,
    running: Option<Pin<Box<dyn Future<Output = Vec<MessageEvent>> + Send>>>,
    next_call_id: u64,
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
    id: u64,
    log: SessionLog,
}

impl fmt::Debug for ScriptedSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedSession")
            .field("options", &self.options)
            .field("turns", &self.turns)
            .field("turns_taken", &self.turns_taken)
            .field("needs_model_turn", &self.needs_model_turn)
            .field("finished", &self.finished)
            .field("queued", &self.queued)
            .field("running", &self.running.is_some())
            .field("next_call_id", &self.next_call_id)
            .field("delay", &self.delay)
            .field("sleep", &self.sleep.is_some())
            .field("id", &self.id)
            .field("log", &self.log)
            .finish()
    }
}

impl ScriptedSession {
    /// Moves the conversation forward when no events are queued and no
    /// tool calls are in flight. Returns `Ok(true)` if there is more to
    /// deliver, `Ok(false)` when the response is complete.
    fn advance(&mut self) -> Result<bool, Error> {
        if !self.needs_model_turn {
            return Ok(false);
        }

        if let Some(cap) = self.options.max_turns {
            if self.turns_taken >= cap {
                debug!("turn limit reached after {} turns", self.turns_taken);
                self.needs_model_turn = false;
                self.queued
                    .push_back(MessageEvent::System("max_turns".to_owned()));
                return Ok(true);
            }
        }

        let Some(turn) = self.turns.pop_front() else {
            if self.turns_taken == 0 {
                // An empty script is an empty, but well-formed, response.
                return Ok(false);
            }
            return Err(Error {
                message: "conversation script exhausted",
                kind: ErrorKind::Other,
            });
        };
        self.needs_model_turn = false;
        self.turns_taken += 1;

        let mut content = Vec::with_capacity(turn.events.len());
        let mut calls = Vec::new();
        for event in turn.events {
            match event {
                ScriptEvent::Text(text) => {
                    content.push(ContentBlock::text(text));
                }
                ScriptEvent::ToolCall { name, arguments } => {
                    let id = format!("call:{}", self.next_call_id);
                    self.next_call_id += 1;
                    let request = ToolCallRequest {
                        id,
                        name,
                        arguments,
                    };
                    content.push(ContentBlock::ToolUse(request.clone()));
                    calls.push(request);
                }
            }
        }
        self.queued
            .push_back(MessageEvent::Assistant(AssistantMessage { content }));

        if !calls.is_empty() {
            let servers = self.options.mcp_servers.clone();
            let allowed = self.options.allowed_tools.clone();
            self.running =
                Some(Box::pin(run_tool_calls(servers, allowed, calls)));
        }
        Ok(true)
    }
}

impl AgentSession for ScriptedSession {
    type Error = Error;

    fn submit_query(
        &mut self,
        query: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        trace!("query submitted: {query}");
        self.needs_model_turn = true;
        ready(Ok(()))
    }

    fn poll_next_message(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<MessageEvent>, Self::Error>> {
        let this = self.get_mut();
        loop {
            if this.finished {
                return Poll::Ready(Ok(None));
            }

            if let Some(sleep) = &mut this.sleep {
                let sleep = sleep.as_mut();
                ready!(sleep.poll(cx));
                this.sleep = None;

                if let Some(event) = this.queued.pop_front() {
                    return Poll::Ready(Ok(Some(event)));
                }
                continue;
            }

            // Deliver queued events one per delay tick.
            if !this.queued.is_empty() {
                this.sleep = Some(Box::pin(sleep(this.delay)));
                continue;
            }

            if let Some(running) = &mut this.running {
                let events = ready!(running.as_mut().poll(cx));
                this.running = None;
                this.queued.extend(events);
                this.needs_model_turn = true;
                continue;
            }

            match this.advance() {
                Ok(true) => {}
                Ok(false) => {
                    this.finished = true;
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    this.finished = true;
                    return Poll::Ready(Err(err));
                }
            }
        }
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        debug!("closed scripted session {}", self.id);
        self.log.record(SessionLifecycle::Closed(self.id));
    }
}

async fn run_tool_calls(
    servers: BTreeMap<String, Arc<ToolServer>>,
    allowed: BTreeSet<String>,
    calls: Vec<ToolCallRequest>,
) -> Vec<MessageEvent> {
    let mut events = Vec::with_capacity(calls.len());
    for call in calls {
        let ToolCallRequest {
            id,
            name,
            arguments,
        } = call;
        let result = dispatch_call(&servers, &allowed, &name, arguments).await;
        let event = match result {
            Ok(output) => ToolCallResult {
                id,
                content: output.content,
                is_error: false,
            },
            Err(err) => ToolCallResult {
                id,
                content: vec![ContentBlock::text(err.reason().into_owned())],
                is_error: true,
            },
        };
        events.push(MessageEvent::ToolResult(event));
    }
    events
}

async fn dispatch_call(
    servers: &BTreeMap<String, Arc<ToolServer>>,
    allowed: &BTreeSet<String>,
    qualified: &str,
    arguments: Value,
) -> tool::ToolResult {
    if !allowed.contains(qualified) {
        return Err(tool::Error::permission_denied().with_reason(format!(
            "tool `{qualified}` is not in the allowed set"
        )));
    }
    let Some((alias, name)) = tool::split_qualified_name(qualified) else {
        return Err(tool::Error::unknown_tool()
            .with_reason(format!("`{qualified}` is not a qualified name")));
    };
    let Some(server) = servers.get(alias) else {
        return Err(tool::Error::unknown_tool().with_reason(format!(
            "no tool server registered under `{alias}`"
        )));
    };
    server.dispatch(name, arguments).await
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;

    use serde_json::json;
    use weather_agent_client::tool::{Tool, ToolOutput, ToolResult};
    use weather_agent_client::AgentOptionsBuilder;

    use super::*;

    static EMPTY_SCHEMA: &Value = &Value::Null;

    struct ProbeTool;

    impl Tool for ProbeTool {
        type Input = Value;

        fn name(&self) -> &str {
            "probe"
        }

        fn description(&self) -> &str {
            "A probe tool"
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            _input: Value,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok(ToolOutput::text("probe result")))
        }
    }

    fn tool_options(allow_probe: bool) -> AgentOptions {
        let mut builder = AgentOptionsBuilder::with_system_prompt("test")
            .with_tool_server(
                "tools",
                ToolServer::new("tools", "1.0.0").with_tool(ProbeTool),
            );
        if allow_probe {
            builder = builder.allow_tool(tool::qualified_name("tools", "probe"));
        }
        builder.build()
    }

    fn probe_turn() -> AssistantTurn {
        AssistantTurn::with_events([
            ScriptEvent::Text("Checking.".to_owned()),
            ScriptEvent::ToolCall {
                name: tool::qualified_name("tools", "probe"),
                arguments: json!({}),
            },
        ])
    }

    async fn drain(
        mut session: ScriptedSession,
        query: &str,
    ) -> Result<Vec<MessageEvent>, Error> {
        session.submit_query(query).await?;
        let mut session = Box::pin(session);
        let mut events = Vec::new();
        loop {
            let event =
                poll_fn(|cx| session.as_mut().poll_next_message(cx)).await?;
            let Some(event) = event else {
                break;
            };
            events.push(event);
        }
        Ok(events)
    }

    #[tokio::test]
    async fn test_text_only_session() {
        let mut client = ScriptedClient::default();
        client.add_session([AssistantTurn::text("Hello there.")]);

        let session = client.connect(tool_options(true)).await.unwrap();
        let events = drain(session, "Hi").await.unwrap();

        assert_eq!(
            events,
            vec![MessageEvent::Assistant(AssistantMessage {
                content: vec![ContentBlock::text("Hello there.")],
            })]
        );
    }

    #[tokio::test]
    async fn test_empty_script_completes() {
        let mut client = ScriptedClient::default();
        client.add_session([]);

        let session = client.connect(tool_options(true)).await.unwrap();
        let events = drain(session, "Hi").await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_tool_dispatch() {
        let mut client = ScriptedClient::default();
        client.add_session([probe_turn(), AssistantTurn::text("Done.")]);

        let session = client.connect(tool_options(true)).await.unwrap();
        let events = drain(session, "Probe it").await.unwrap();

        assert_eq!(events.len(), 3);
        let MessageEvent::Assistant(msg) = &events[0] else {
            panic!("expected an assistant message");
        };
        assert_eq!(msg.content.len(), 2);
        let MessageEvent::ToolResult(result) = &events[1] else {
            panic!("expected a tool result");
        };
        assert!(!result.is_error);
        assert_eq!(result.content, vec![ContentBlock::text("probe result")]);
        let MessageEvent::Assistant(msg) = &events[2] else {
            panic!("expected an assistant message");
        };
        assert_eq!(msg.content, vec![ContentBlock::text("Done.")]);
    }

    #[tokio::test]
    async fn test_disallowed_tool() {
        let mut client = ScriptedClient::default();
        client.add_session([probe_turn(), AssistantTurn::text("Oh well.")]);

        let session = client.connect(tool_options(false)).await.unwrap();
        let events = drain(session, "Probe it").await.unwrap();

        let MessageEvent::ToolResult(result) = &events[1] else {
            panic!("expected a tool result");
        };
        assert!(result.is_error);
    }

    #[tokio::test]
    async fn test_turn_limit() {
        let mut client = ScriptedClient::default();
        client.add_session([
            probe_turn(),
            probe_turn(),
            probe_turn(),
            AssistantTurn::text("Never reached."),
        ]);

        let mut options = tool_options(true);
        options.max_turns = Some(2);
        let session = client.connect(options).await.unwrap();
        let events = drain(session, "Probe it").await.unwrap();

        let assistant_turns = events
            .iter()
            .filter(|e| matches!(e, MessageEvent::Assistant(_)))
            .count();
        assert_eq!(assistant_turns, 2);
        assert_eq!(
            events.last(),
            Some(&MessageEvent::System("max_turns".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_script_exhausted_after_tool_call() {
        let mut client = ScriptedClient::default();
        client.add_session([probe_turn()]);

        let session = client.connect(tool_options(true)).await.unwrap();
        let result = drain(session, "Probe it").await;
        assert!(matches!(result, Err(_)));
    }

    #[tokio::test]
    async fn test_connect_failure_injection() {
        let mut client = ScriptedClient::default();
        client.add_session([AssistantTurn::text("Hello.")]);
        client.fail_connects(1);

        let err = client.connect(tool_options(true)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);

        // The next attempt succeeds.
        client.connect(tool_options(true)).await.unwrap();
    }

    #[tokio::test]
    async fn test_session_lifecycle_log() {
        let mut client = ScriptedClient::default();
        client.add_session([AssistantTurn::text("First.")]);
        client.add_session([AssistantTurn::text("Second.")]);
        let log = client.session_log();

        let session = client.connect(tool_options(true)).await.unwrap();
        drain(session, "one").await.unwrap();
        let session = client.connect(tool_options(true)).await.unwrap();
        drain(session, "two").await.unwrap();

        assert_eq!(
            log.events(),
            vec![
                SessionLifecycle::Opened(0),
                SessionLifecycle::Closed(0),
                SessionLifecycle::Opened(1),
                SessionLifecycle::Closed(1),
            ]
        );
    }
}
